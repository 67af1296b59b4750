use std::fs;
use std::path::Path;
use clap::{Command, Arg, ArgAction};
use serde::Deserialize;
use walkdir::WalkDir;

use utils_common::models::{Comment, Resource};
use utils_common::sample::{sample_comments, sample_resources};

// 导入目录索引构建器
use catalog_filter::builder::CatalogBuilder;

/// 索引文件名
const INDEX_FILE_NAME: &str = "catalog_index.bin";

/// 源文件支持的三种格式
#[derive(Deserialize)]
#[serde(untagged)]
enum SourceFile {
    Bundle {
        resources: Vec<Resource>,
        #[serde(default)]
        comments: Vec<Comment>,
    },
    Many(Vec<Resource>),
    Single(Box<Resource>),
}

/// 扫描结果
#[derive(Default)]
struct ScanResult {
    resources: Vec<Resource>,
    comments: Vec<Comment>,
    files: usize,
    skipped: usize,
}

// 主函数
fn main() {
    // 设置命令行参数
    let matches = Command::new("资源目录索引生成器")
        .version(env!("CARGO_PKG_VERSION"))
        .about("从资源JSON文件生成压缩的目录索引")
        .arg(Arg::new("source")
            .short('s')
            .long("source")
            .value_name("SOURCE_DIR")
            .help("资源JSON文件目录")
            .required_unless_present("sample"))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("OUTPUT_DIR")
            .help("索引输出目录路径")
            .required(true))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示详细信息")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("sample")
            .long("sample")
            .help("加入内置的示例资源和评论")
            .action(ArgAction::SetTrue))
        .get_matches();

    // 获取参数值
    let source_dir = matches.get_one::<String>("source");
    let Some(output_dir) = matches.get_one::<String>("output") else {
        eprintln!("错误: 缺少输出目录");
        std::process::exit(2);
    };
    let verbose = matches.get_flag("verbose");
    let include_sample = matches.get_flag("sample");

    // 检查目录
    if let Some(source_dir) = source_dir {
        let source_path = Path::new(source_dir);
        if !source_path.is_dir() {
            eprintln!("错误: 源目录不存在或不是有效目录 '{}'", source_dir);
            std::process::exit(1);
        }
    }

    // 创建输出目录
    if let Err(e) = fs::create_dir_all(output_dir) {
        eprintln!("错误: 无法创建输出目录 '{}': {}", output_dir, e);
        std::process::exit(1);
    }

    println!("开始生成目录索引...");
    println!("输出目录: {}", output_dir);

    match generate_index(source_dir.map(String::as_str), output_dir, verbose, include_sample) {
        Ok(count) => println!("目录索引生成成功！共 {} 个资源", count),
        Err(e) => {
            eprintln!("错误: 目录索引生成失败: {}", e);
            std::process::exit(1);
        }
    }
}

// 生成索引的主函数，返回写入的资源数量
fn generate_index(
    source_dir: Option<&str>,
    output_dir: &str,
    verbose: bool,
    include_sample: bool,
) -> Result<usize, String> {
    let start_time = std::time::Instant::now();

    let mut scan = match source_dir {
        Some(dir) => {
            println!("扫描资源文件: {}", dir);
            scan_json_files(dir, verbose)?
        }
        None => ScanResult::default(),
    };
    println!(
        "扫描完成。读取 {} 个文件，有效资源 {} 个，跳过 {} 条。",
        scan.files,
        scan.resources.len(),
        scan.skipped
    );

    if include_sample {
        scan.resources.extend(sample_resources()?);
        scan.comments.extend(sample_comments()?);
    }

    if scan.resources.is_empty() {
        return Err("没有找到有效资源".to_string());
    }

    let mut builder = CatalogBuilder::new();
    for resource in scan.resources {
        let id = resource.id.clone();
        if let Err(e) = builder.add_resource(resource) {
            if verbose {
                eprintln!("跳过资源 {}: {}", id, e);
            }
        }
    }
    for comment in scan.comments {
        builder.add_comment(comment);
    }

    let index_path = Path::new(output_dir).join(INDEX_FILE_NAME);
    builder.save_catalog_index(&index_path.to_string_lossy())?;

    let elapsed = start_time.elapsed();
    println!("索引生成完成！耗时: {:.2}秒", elapsed.as_secs_f32());

    Ok(builder.resource_count())
}

// 递归扫描目录下的JSON文件
fn scan_json_files(dir_path: &str, verbose: bool) -> Result<ScanResult, String> {
    let mut scan = ScanResult::default();

    for entry in WalkDir::new(dir_path).sort_by_file_name() {
        let entry = entry.map_err(|e| format!("遍历目录时出错: {}", e))?;

        // 只处理JSON文件
        if !entry.file_type().is_file() || !entry.path().extension().map_or(false, |ext| ext == "json") {
            continue;
        }
        scan.files += 1;

        match read_source_file(entry.path()) {
            Ok((resources, comments)) => {
                for resource in resources {
                    match check_resource(&resource) {
                        Ok(()) => scan.resources.push(resource),
                        Err(reason) => {
                            scan.skipped += 1;
                            if verbose {
                                eprintln!("跳过 {} 中的资源: {}", entry.path().display(), reason);
                            }
                        }
                    }
                }
                scan.comments.extend(comments);
            }
            Err(err) => {
                scan.skipped += 1;
                if verbose {
                    eprintln!("解析文件时出错 {}: {}", entry.path().display(), err);
                }
            }
        }
    }

    Ok(scan)
}

// 读取单个源文件
fn read_source_file(path: &Path) -> Result<(Vec<Resource>, Vec<Comment>), String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("无法读取文件 {}: {}", path.display(), e))?;

    let parsed: SourceFile = serde_json::from_str(&raw).map_err(|e| format!("JSON格式错误: {}", e))?;
    Ok(match parsed {
        SourceFile::Bundle { resources, comments } => (resources, comments),
        SourceFile::Many(resources) => (resources, Vec::new()),
        SourceFile::Single(resource) => (vec![*resource], Vec::new()),
    })
}

// ID 和标题不能为空
fn check_resource(resource: &Resource) -> Result<(), String> {
    if resource.id.trim().is_empty() {
        return Err(format!("资源 '{}' 缺少ID", resource.title));
    }
    if resource.title.trim().is_empty() {
        return Err(format!("资源 {} 缺少标题", resource.id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_filter::catalog::Catalog;
    use pretty_assertions::assert_eq;

    const ONE: &str = r#"{
        "id": "10", "title": "Compiler Design T3", "description": "Parsing",
        "fileType": "PDF", "year": "3rd Year", "semester": "Semester 6",
        "subject": "Compiler Design", "examType": "T3", "uploadDate": "2024-02-01"
    }"#;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn reads_all_three_file_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();

        write(dir.path(), "single.json", ONE);
        write(dir.path(), "many.json", &format!("[{}]", ONE.replace("\"10\"", "\"11\"")));
        write(
            &nested,
            "bundle.json",
            &format!(
                r#"{{"resources": [{}], "comments": [{{"id": "c1", "resourceId": "12", "userId": "1",
                    "userName": "John Doe", "content": "Nice", "timestamp": "2024-02-02T08:00:00Z"}}]}}"#,
                ONE.replace("\"10\"", "\"12\"")
            ),
        );
        write(dir.path(), "notes.txt", "ignored");

        let scan = scan_json_files(dir.path().to_str().unwrap(), false).unwrap();
        let mut ids: Vec<&str> = scan.resources.iter().map(|r| r.id.as_str()).collect();
        ids.sort();

        assert_eq!(scan.files, 3);
        assert_eq!(ids, vec!["10", "11", "12"]);
        assert_eq!(scan.comments.len(), 1);
        assert_eq!(scan.skipped, 0);
    }

    #[test]
    fn broken_files_and_blank_titles_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.json", "{ nope");
        write(dir.path(), "blank.json", &ONE.replace("Compiler Design T3", " "));

        let scan = scan_json_files(dir.path().to_str().unwrap(), false).unwrap();
        assert!(scan.resources.is_empty());
        assert_eq!(scan.skipped, 2);
    }

    #[test]
    fn writes_a_loadable_index() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(source.path(), "single.json", ONE);
        // 与示例数据ID冲突的资源只保留第一个
        write(source.path(), "clash.json", &ONE.replace("\"10\"", "\"1\""));

        let count = generate_index(
            source.path().to_str(),
            output.path().to_str().unwrap(),
            false,
            true,
        )
        .unwrap();
        assert_eq!(count, 7);

        let data = fs::read(output.path().join(INDEX_FILE_NAME)).unwrap();
        let catalog = Catalog::from_compressed(&data).unwrap();
        assert_eq!(catalog.resources().len(), 7);
        assert_eq!(catalog.resource("1").unwrap().title, "Compiler Design T3");
        assert_eq!(catalog.comments_for("1").len(), 2);
    }

    #[test]
    fn empty_source_without_sample_fails() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let outcome = generate_index(source.path().to_str(), output.path().to_str().unwrap(), false, false);
        assert!(outcome.is_err());
    }
}
