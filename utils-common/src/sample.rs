//! 站点首次启动时写入存储的示例数据

use crate::models::{Comment, Resource};

const SAMPLE_RESOURCES: &str = r##"[
  {
    "id": "1",
    "title": "Database Management Systems - T2 Question Paper",
    "description": "Mid-term exam questions covering normalization, SQL queries, and transaction management.",
    "fileName": "DBMS_T2_2024.pdf",
    "fileUrl": "#",
    "fileSize": "2.4 MB",
    "fileType": "PDF",
    "year": "2nd Year",
    "semester": "Semester 3",
    "subject": "Database Management Systems",
    "examType": "T2",
    "uploaderId": "1",
    "uploaderName": "John Doe",
    "uploadDate": "2024-01-15",
    "downloadCount": 142,
    "likes": 23,
    "isApproved": true,
    "tags": ["DBMS", "SQL", "Normalization"]
  },
  {
    "id": "2",
    "title": "Data Structures Lab Manual",
    "description": "Complete lab manual with implementations of stacks, queues, linked lists, and trees.",
    "fileName": "DS_Lab_Manual.pdf",
    "fileUrl": "#",
    "fileSize": "5.8 MB",
    "fileType": "PDF",
    "year": "2nd Year",
    "semester": "Semester 2",
    "subject": "Data Structures",
    "examType": "Lab",
    "uploaderId": "2",
    "uploaderName": "Admin User",
    "uploadDate": "2024-01-10",
    "downloadCount": 89,
    "likes": 31,
    "isApproved": true,
    "tags": ["Data Structures", "C++", "Algorithms"]
  },
  {
    "id": "3",
    "title": "Operating Systems Summative Notes",
    "description": "Comprehensive notes covering process management, memory management, and file systems.",
    "fileName": "OS_Summative_Notes.pdf",
    "fileUrl": "#",
    "fileSize": "3.2 MB",
    "fileType": "PDF",
    "year": "3rd Year",
    "semester": "Semester 5",
    "subject": "Operating Systems",
    "examType": "Summative",
    "uploaderId": "1",
    "uploaderName": "John Doe",
    "uploadDate": "2024-01-20",
    "downloadCount": 76,
    "likes": 18,
    "isApproved": true,
    "tags": ["OS", "Process", "Memory Management"]
  },
  {
    "id": "4",
    "title": "Computer Networks T1 Solutions",
    "description": "Solved question paper with detailed explanations for network protocols and OSI model.",
    "fileName": "CN_T1_Solutions.pdf",
    "fileUrl": "#",
    "fileSize": "1.9 MB",
    "fileType": "PDF",
    "year": "3rd Year",
    "semester": "Semester 6",
    "subject": "Computer Networks",
    "examType": "T1",
    "uploaderId": "3",
    "uploaderName": "Jane Smith",
    "uploadDate": "2024-01-18",
    "downloadCount": 54,
    "likes": 12,
    "isApproved": true,
    "tags": ["Networks", "OSI", "TCP/IP"]
  },
  {
    "id": "5",
    "title": "Software Engineering Project Report Template",
    "description": "Professional template for final year project reports with proper formatting and sections.",
    "fileName": "SE_Project_Template.docx",
    "fileUrl": "#",
    "fileSize": "234 KB",
    "fileType": "DOCX",
    "year": "4th Year",
    "semester": "Semester 8",
    "subject": "Software Engineering",
    "examType": "Project",
    "uploaderId": "2",
    "uploaderName": "Admin User",
    "uploadDate": "2024-01-12",
    "downloadCount": 95,
    "likes": 28,
    "isApproved": true,
    "tags": ["Software Engineering", "Project", "Template"]
  },
  {
    "id": "6",
    "title": "Machine Learning Algorithms Presentation",
    "description": "PowerPoint presentation covering linear regression, decision trees, and neural networks.",
    "fileName": "ML_Algorithms.pptx",
    "fileUrl": "#",
    "fileSize": "8.7 MB",
    "fileType": "PPTX",
    "year": "4th Year",
    "semester": "Semester 7",
    "subject": "Machine Learning",
    "examType": "Presentation",
    "uploaderId": "1",
    "uploaderName": "John Doe",
    "uploadDate": "2024-01-25",
    "downloadCount": 67,
    "likes": 21,
    "isApproved": true,
    "tags": ["ML", "AI", "Algorithms"]
  }
]"##;

const SAMPLE_COMMENTS: &str = r##"[
  {
    "id": "1",
    "resourceId": "1",
    "userId": "2",
    "userName": "Admin User",
    "content": "Great resource! The explanations are very clear and helped me understand normalization better.",
    "timestamp": "2024-01-16T10:30:00Z",
    "likes": 5,
    "dislikes": 0
  },
  {
    "id": "2",
    "resourceId": "1",
    "userId": "3",
    "userName": "Jane Smith",
    "content": "Question 3 seems to have an error in the answer. Can someone verify?",
    "timestamp": "2024-01-17T14:20:00Z",
    "likes": 2,
    "dislikes": 0
  },
  {
    "id": "3",
    "resourceId": "2",
    "userId": "1",
    "userName": "John Doe",
    "content": "The tree implementation example on page 15 is particularly helpful. Thanks for sharing!",
    "timestamp": "2024-01-11T16:45:00Z",
    "likes": 8,
    "dislikes": 0
  }
]"##;

/// 示例资源
pub fn sample_resources() -> Result<Vec<Resource>, String> {
    serde_json::from_str(SAMPLE_RESOURCES).map_err(|e| format!("示例资源解析失败: {}", e))
}

/// 示例评论
pub fn sample_comments() -> Result<Vec<Comment>, String> {
    serde_json::from_str(SAMPLE_COMMENTS).map_err(|e| format!("示例评论解析失败: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sample_data_parses() {
        let resources = sample_resources().unwrap();
        let comments = sample_comments().unwrap();

        assert_eq!(resources.len(), 6);
        assert_eq!(comments.len(), 3);
        assert_eq!(
            resources.iter().map(|r| r.download_count).collect::<Vec<_>>(),
            vec![142, 89, 76, 54, 95, 67]
        );
        assert!(comments.iter().all(|c| resources.iter().any(|r| r.id == c.resource_id)));
    }
}
