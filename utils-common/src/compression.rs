use std::io::{self, Read, Write};
use flate2::{Compression, write::GzEncoder, read::GzDecoder};

/// 魔数常量 - 用于标识快照格式
pub const MAGIC_BYTES: &'static [u8] = b"NZCMP"; // Notezilla Compressed

/// 头部长度：魔数 + 2字节版本号 + 4字节原始长度
const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 默认支持的最大主版本号
pub const DEFAULT_MAX_VERSION: u8 = 1;

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

/// 将对象序列化为二进制格式
pub fn to_binary<T: serde::Serialize>(obj: &T) -> Result<Vec<u8>, io::Error> {
    bincode::serde::encode_to_vec(obj, bincode::config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("序列化失败: {}", e)))
}

/// 从二进制格式反序列化对象
pub fn from_binary<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    bincode::serde::decode_from_slice(data, bincode::config::standard())
        .map_err(|e| invalid_data(format!("反序列化失败: {}", e)))
        .map(|(value, _)| value)
}

/// 将对象序列化为压缩的二进制格式
pub fn to_compressed<T: serde::Serialize>(obj: &T, version: [u8; 2]) -> Result<Vec<u8>, io::Error> {
    let binary = to_binary(obj)?;
    let original_len = u32::try_from(binary.len())
        .map_err(|_| invalid_data(format!("数据过大，无法写入头部: {} 字节", binary.len())))?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&binary)?;
    let compressed_data = encoder.finish()?;

    let mut output = Vec::with_capacity(HEADER_LEN + compressed_data.len());
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);
    output.extend_from_slice(&original_len.to_le_bytes());
    output.extend_from_slice(&compressed_data);

    Ok(output)
}

/// 快照头部信息
struct Header<'a> {
    version: [u8; 2],
    original_size: usize,
    payload: &'a [u8],
}

/// 解析并校验头部
fn read_header(data: &[u8], max_version: u8) -> Result<Header<'_>, io::Error> {
    if data.len() < HEADER_LEN {
        return Err(invalid_data(format!("数据太短，无法解析: {} 字节", data.len())));
    }

    let (magic, rest) = data.split_at(MAGIC_BYTES.len());
    if magic != MAGIC_BYTES {
        return Err(invalid_data("无效的文件格式：魔数不匹配".to_string()));
    }

    let version = [rest[0], rest[1]];
    if version[0] > max_version {
        return Err(invalid_data(format!("不支持的版本: {}.{}", version[0], version[1])));
    }

    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&rest[2..6]);

    Ok(Header {
        version,
        original_size: u32::from_le_bytes(size_bytes) as usize,
        payload: &rest[6..],
    })
}

/// 从压缩的二进制格式反序列化对象，使用默认最大版本
pub fn from_compressed<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    from_compressed_with_max_version(data, DEFAULT_MAX_VERSION)
}

/// 从压缩的二进制格式反序列化对象，允许指定支持的最大版本
pub fn from_compressed_with_max_version<T: for<'a> serde::de::Deserialize<'a>>(
    data: &[u8],
    max_version: u8,
) -> Result<T, io::Error> {
    let header = read_header(data, max_version)?;

    // 头部长度不可信：最多多读一个字节，超出即视为不匹配
    let mut decompressed_data = Vec::new();
    GzDecoder::new(header.payload)
        .take(header.original_size as u64 + 1)
        .read_to_end(&mut decompressed_data)?;

    if decompressed_data.len() != header.original_size {
        return Err(invalid_data(format!(
            "解压后数据大小不匹配: 期望 {} 字节, 实际 {} 字节",
            header.original_size,
            decompressed_data.len()
        )));
    }

    from_binary(&decompressed_data)
}

/// 验证压缩数据头部是否有效，返回版本号
pub fn validate_compressed_data(data: &[u8]) -> Result<[u8; 2], io::Error> {
    validate_compressed_data_with_max_version(data, DEFAULT_MAX_VERSION)
}

/// 验证压缩数据头部是否有效，允许指定支持的最大版本
pub fn validate_compressed_data_with_max_version(data: &[u8], max_version: u8) -> Result<[u8; 2], io::Error> {
    read_header(data, max_version).map(|header| header.version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Shelf {
        name: String,
        counts: Vec<u64>,
    }

    fn shelf() -> Shelf {
        Shelf {
            name: "Semester 3".to_string(),
            counts: vec![142, 89, 76],
        }
    }

    #[test]
    fn header_carries_magic_and_version() {
        let data = to_compressed(&shelf(), [1, 0]).unwrap();

        assert_eq!(&data[..5], MAGIC_BYTES);
        assert_eq!(validate_compressed_data(&data).unwrap(), [1, 0]);
        assert_eq!(from_compressed::<Shelf>(&data).unwrap(), shelf());
    }

    #[test]
    fn newer_major_version_is_refused() {
        let data = to_compressed(&shelf(), [2, 0]).unwrap();

        let err = from_compressed::<Shelf>(&data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(from_compressed_with_max_version::<Shelf>(&data, 2).is_ok());
    }

    #[test]
    fn wrong_magic_and_short_input_are_invalid() {
        let mut data = to_compressed(&shelf(), [1, 0]).unwrap();
        data[0] = b'X';

        assert_eq!(validate_compressed_data(&data).unwrap_err().kind(), io::ErrorKind::InvalidData);
        assert_eq!(validate_compressed_data(b"NZCMP").unwrap_err().kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn length_mismatch_is_detected() {
        let mut data = to_compressed(&shelf(), [1, 0]).unwrap();
        let bogus = 9999u32.to_le_bytes();
        data[7..11].copy_from_slice(&bogus);

        assert!(from_compressed::<Shelf>(&data).is_err());
    }

    #[test]
    fn forged_length_is_rejected_without_allocating_it() {
        let mut data = to_compressed(&shelf(), [1, 0]).unwrap();
        data[7..11].copy_from_slice(&u32::MAX.to_le_bytes());

        let err = from_compressed::<Shelf>(&data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
