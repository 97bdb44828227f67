//! Instruction payload for the synthesis service

use serde::Serialize;

/// Completion length cap
pub const MAX_TOKENS: u32 = 400;

/// Sampling temperature; reviews should vary between submissions
pub const TEMPERATURE: f32 = 0.9;

const SYSTEM_PROMPT: &str =
    "你是一个专业的餐厅点评润色助手，擅长将简单的标签转化为自然流畅的点评文字。";

const USER_PROMPT_TEMPLATE: &str = "请将以下餐厅评价标签随机排列，润色成一段自然流畅的餐厅点评，要求：
1. 语言自然亲切，以顾客的视角分享用餐体验，适合发布在点评网站上。
2. 保持原有信息的准确性，包括正面、中性和负面评价。
3. 字数随机控制在50-150字之间。
4. 语调真实客观，如实反映体验。
5. 根据综合评价随机生成一句自然的开场白。
6. 随机选择提及或称赞以下菜品：香煎石斑鱼、牛杂煲、口味虾、猪脚煨凤爪、小炒黄牛肉、擂椒茄子皮蛋、藠头炒青笋、青笋炒腊肉、瓦罐汤。
7. 开头结尾根据整体评价来补充一些主观感受和客观建议，使评价内容显得真实和多样化。
8. 仿照小红书晒单风格，在合适恰当的位置插入一些表情符号。
9. 使用中文，不要夹杂其他语言。

评价标签：{tags}

请直接返回润色后的点评内容，不需要其他说明。";

/// One chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-style completion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Build the request for one submission
///
/// The review text is the only variable part.
pub fn build_request(review_text: &str) -> SynthesisRequest {
    SynthesisRequest {
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(USER_PROMPT_TEMPLATE.replace("{tags}", review_text)),
        ],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}
