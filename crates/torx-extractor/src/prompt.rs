//! Model instructions and request construction
//!
//! The target schema is the contract with the model and with every consumer
//! of stored records (the dashboard reads these keys).

use crate::config::ModelConfig;
use torx_domain::SourceDocument;
use torx_llm::{BatchRequestLine, ChatCompletionBody, ChatMessage, ResponseFormat};

/// Shape the model is asked to return
pub const TARGET_JSON_SCHEMA: &str = r#"
{
  "bid_submission_documents_part_1": {
    "1_legal_entity_documents": {
      "case_partnership": { "description": "ระบุประเภท เช่น ห้างหุ้นส่วน", "required_documents": [] },
      "case_company": { "description": "ระบุประเภท เช่น บริษัทจำกัด", "required_documents": [] }
    },
    "2_individual_documents": { "description": "บุคคลธรรมดา", "required_documents": [] },
    "3_joint_venture_documents": { "description": "ผู้ร่วมค้า", "required_documents": [] },
    "4_financial_capability_evidence": { "description": "หลักฐานการเงิน", "options": [{"condition": "...", "document": "..."}], "note": "..." },
    "5_general_documents": { "description": "เอกสารอื่นๆ", "required_documents": [] }
  }
}
"#;

const SYSTEM_PROMPT_HEAD: &str = "
คุณคือผู้เชี่ยวชาญด้านการวิเคราะห์เอกสาร TOR
หน้าที่: สกัดข้อมูลรายการเอกสารจากข้อความ \"ส่วนที่ 1 (หลักฐานการยื่นข้อเสนอ)\" ที่ได้รับ
Output: JSON ตาม Schema นี้เท่านั้น:
";

const SYSTEM_PROMPT_RULES: &str = "
กฎ:
- ตอบกลับเป็น JSON เท่านั้น
- ถ้าข้อมูลส่วนไหนไม่มี ให้ใส่ [] หรือ null
- ห้ามเพิ่ม Key อื่นนอกเหนือจาก Schema
";

/// Prefix of the user message carrying the extracted clause
pub const USER_MESSAGE_PREFIX: &str = "ข้อมูลเอกสาร:\n";

/// Full system instruction with the schema embedded
pub fn system_prompt() -> String {
    format!("{}{}{}", SYSTEM_PROMPT_HEAD, TARGET_JSON_SCHEMA, SYSTEM_PROMPT_RULES)
}

/// Build the job-file line for one document
///
/// The file name is the custom id so results can be matched back to
/// their project.
pub fn build_request(
    document: &SourceDocument,
    section: &str,
    model: &ModelConfig,
) -> BatchRequestLine {
    let body = ChatCompletionBody {
        model: model.name.clone(),
        messages: vec![
            ChatMessage::system(system_prompt()),
            ChatMessage::user(format!("{}{}", USER_MESSAGE_PREFIX, section)),
        ],
        response_format: ResponseFormat::json_object(),
        temperature: model.temperature,
    };
    BatchRequestLine::chat(document.file_name.clone(), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::path::PathBuf;
    use torx_domain::ProjectId;

    fn document() -> SourceDocument {
        SourceDocument {
            project_id: ProjectId::new("66019123456"),
            file_name: "66019123456.pdf".to_string(),
            path: PathBuf::from("input_pdfs/66019123456.pdf"),
        }
    }

    #[test]
    fn test_schema_is_valid_json() {
        let schema: Value = serde_json::from_str(TARGET_JSON_SCHEMA).unwrap();
        let part = &schema["bid_submission_documents_part_1"];
        assert!(part["1_legal_entity_documents"]["case_company"].is_object());
        assert!(part["4_financial_capability_evidence"]["options"].is_array());
        assert!(part["5_general_documents"]["required_documents"].is_array());
    }

    #[test]
    fn test_request_line_shape() {
        let line = build_request(&document(), "(๑) สำเนาหนังสือรับรอง", &ModelConfig::default());
        let json: Value = serde_json::from_str(&line.to_json_line().unwrap()).unwrap();

        assert_eq!(json["custom_id"], "66019123456.pdf");
        assert_eq!(json["method"], "POST");
        assert_eq!(json["url"], "/v1/chat/completions");
        assert_eq!(json["body"]["model"], "gpt-4o-mini");
        assert_eq!(json["body"]["temperature"], 0.1);
        assert_eq!(json["body"]["response_format"]["type"], "json_object");

        let messages = json["body"]["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert!(messages[0]["content"]
            .as_str()
            .unwrap()
            .contains("\"bid_submission_documents_part_1\""));
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "ข้อมูลเอกสาร:\n(๑) สำเนาหนังสือรับรอง");
    }

    #[test]
    fn test_thai_text_is_not_escaped() {
        let line = build_request(&document(), "หนังสือ", &ModelConfig::default())
            .to_json_line()
            .unwrap();
        assert!(line.contains("ข้อมูลเอกสาร"));
        assert!(!line.contains("\\u0e"));
    }

    #[test]
    fn test_model_settings_flow_through() {
        let model = ModelConfig {
            name: "gpt-4.1-mini".to_string(),
            temperature: 0.0,
        };
        let line = build_request(&document(), "x", &model);
        assert_eq!(line.body.model, "gpt-4.1-mini");
        assert_eq!(line.body.temperature, 0.0);
    }
}
