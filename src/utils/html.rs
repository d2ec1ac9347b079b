//! HTML 清洗工具
//!
//! 题干和选项来自富文本编辑器，终端展示前要剥标签、解实体、抽图片地址

use phf::phf_map;
use regex::Regex;

/// 常见 HTML 实体表（&amp; 单独处理，见 strip_tags）
static ENTITIES: phf::Map<&'static str, &'static str> = phf_map! {
    "&nbsp;" => " ",
    "&lt;" => "<",
    "&gt;" => ">",
    "&quot;" => "\"",
    "&#39;" => "'",
    "&ldquo;" => "“",
    "&rdquo;" => "”",
    "&hellip;" => "…",
    "&middot;" => "·",
    "&times;" => "×",
    "&divide;" => "÷",
};

/// 剥掉 HTML 标签、解码常见实体、压缩空白
pub fn strip_tags(html: &str) -> String {
    let mut text = html.to_string();
    if let Ok(re) = Regex::new(r"<[^>]+>") {
        text = re.replace_all(&text, " ").to_string();
    }
    for (entity, plain) in ENTITIES.entries() {
        if text.contains(entity) {
            text = text.replace(entity, plain);
        }
    }
    // &amp; 最后解，避免把 &amp;lt; 解成 <
    text = text.replace("&amp;", "&");

    let mut result = String::with_capacity(text.len());
    let mut last_was_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                result.push(' ');
            }
            last_was_space = true;
        } else {
            result.push(ch);
            last_was_space = false;
        }
    }
    result.trim().to_string()
}

/// 提取题干里的图片地址
pub fn extract_img_urls(html: &str) -> Vec<String> {
    let mut urls = Vec::new();
    if let Ok(re) = Regex::new(r#"<img\s+[^>]*src="([^"]+)""#) {
        for cap in re.captures_iter(html) {
            if let Some(src) = cap.get(1) {
                urls.push(src.as_str().to_string());
            }
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_and_entities() {
        let html = "<p>已知 a &lt; b，&nbsp;下列<strong>正确</strong>的是</p>";
        assert_eq!(strip_tags(html), "已知 a < b， 下列 正确 的是");
    }

    #[test]
    fn test_strip_collapses_whitespace() {
        let html = "<div>\n  第一行\n\n  第二行  </div>";
        assert_eq!(strip_tags(html), "第一行 第二行");
    }

    #[test]
    fn test_amp_is_decoded_last() {
        assert_eq!(strip_tags("a &amp;lt; b"), "a &lt; b");
    }

    #[test]
    fn test_extract_img_urls() {
        let html = r#"<p>如图<img class="pic" src="https://cdn.example.com/1.png">和
            <img src="https://cdn.example.com/2.png"></p>"#;
        assert_eq!(
            extract_img_urls(html),
            vec![
                "https://cdn.example.com/1.png".to_string(),
                "https://cdn.example.com/2.png".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_imgs_gives_empty_list() {
        assert!(extract_img_urls("<p>纯文字题干</p>").is_empty());
    }
}
