//! Copyable `<figure>` markup for an analysed image.

/// Escape text for use inside HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn figure_html(image_name: &str, alt_text: &str, caption: &str) -> String {
    format!(
        "<figure>\n  <img src=\"{}\" alt=\"{}\">\n  <figcaption>{}</figcaption>\n</figure>",
        escape_html(image_name),
        escape_html(alt_text),
        escape_html(caption)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figure_embeds_name_alt_and_caption() {
        assert_eq!(
            figure_html("dog.jpg", "A dog", "a dog on grass"),
            "<figure>\n  <img src=\"dog.jpg\" alt=\"A dog\">\n  <figcaption>a dog on grass</figcaption>\n</figure>"
        );
    }

    #[test]
    fn markup_in_values_is_escaped() {
        let html = figure_html("a\"b.png", "<script>", "Tom & Jerry's");
        assert!(html.contains("src=\"a&quot;b.png\""));
        assert!(html.contains("alt=\"&lt;script&gt;\""));
        assert!(html.contains("Tom &amp; Jerry&#39;s"));
    }
}
