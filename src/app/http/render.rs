use crate::core::models::keyword::KeywordBidRecord;
use std::fmt::Write;

/// What the upload page shows under its form
pub enum PageBody<'a> {
    Empty,
    Table(&'a [KeywordBidRecord]),
    Error(&'a str),
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());

    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }

    escaped
}

/// Striped table, one column per output field and no index column
pub fn records_table(records: &[KeywordBidRecord]) -> String {
    let mut html = String::from("<table class=\"table table-striped\">\n<thead>\n<tr>");

    for column in KeywordBidRecord::COLUMNS {
        let _ = write!(html, "<th>{}</th>", escape_html(column));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for record in records {
        html.push_str("<tr>");
        for cell in record.display_cells() {
            let _ = write!(html, "<td>{}</td>", escape_html(&cell));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");
    html
}

pub fn upload_page(default_target_acos: f64, body: PageBody<'_>) -> String {
    let content = match body {
        PageBody::Empty => String::new(),
        PageBody::Table(records) => records_table(records),
        PageBody::Error(message) => format!(
            "<div class=\"alert alert-danger\" role=\"alert\">{}</div>",
            escape_html(message)
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>PPC bid optimizer</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
</head>
<body>
<div class="container py-4">
<h1>PPC bid optimizer</h1>
<form method="post" action="/" enctype="multipart/form-data" class="mb-4">
<div class="mb-3">
<label for="file" class="form-label">Keyword report (.csv, .xlsx, .xls)</label>
<input type="file" class="form-control" id="file" name="file" accept=".csv,.xlsx,.xls">
</div>
<div class="mb-3">
<label for="target_acos" class="form-label">Target ACOS (%)</label>
<input type="number" step="any" min="0" class="form-control" id="target_acos" name="target_acos" value="{target}">
</div>
<button type="submit" class="btn btn-primary">Process</button>
</form>
{content}
</div>
</body>
</html>
"#,
        target = default_target_acos,
        content = content,
    )
}
