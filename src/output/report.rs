use super::PageOutput;
use crate::render::escape_html;

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

/// Standalone HTML document around the rendered page body. The page output
/// (minus markup) is embedded as JSON for client-side scripts.
pub fn render_html(output: &PageOutput) -> Vec<u8> {
    let json = serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string());
    let json = json_for_script_tag(&json);
    let title = escape_html(output.title.as_deref().unwrap_or("Raya Homes"));
    let meta = output
        .meta_description
        .as_deref()
        .map(|d| {
            format!(
                "\n  <meta name=\"description\" content=\"{}\"/>",
                escape_html(d)
            )
        })
        .unwrap_or_default();
    let count = if output.count_label.is_empty() {
        String::new()
    } else {
        format!(
            "\n    <p class=\"results-count\" id=\"resultsCount\">{}</p>",
            escape_html(&output.count_label)
        )
    };

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title}</title>{meta}
</head>
<body>
  <script type="application/json" id="page-data">{json}</script>
  <main class="page" data-page="{page}">{count}
    <div class="page-content">
{body}    </div>
  </main>
</body>
</html>
"####,
        page = serde_json::to_value(output.page)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default(),
        body = output.html,
    );
    html.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{PageKind, PageState};

    #[test]
    fn document_wraps_body_and_escapes_title() {
        let mut out = PageOutput::new(PageKind::PropertyDetail, PageState::Ready);
        out.title = Some("1 A & B St | Raya Homes".to_string());
        out.meta_description = Some("desc </script>".to_string());
        out.html = "<article></article>\n".to_string();
        let html = String::from_utf8(render_html(&out)).unwrap();
        assert!(html.contains("<title>1 A &amp; B St | Raya Homes</title>"));
        assert!(html.contains("data-page=\"property_detail\""));
        assert!(html.contains("<article></article>"));
        assert!(!html.contains("desc </script>"));
    }
}
