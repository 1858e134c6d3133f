//! QR codes rendered as HTML tables, for email clients without image support.

use std::fmt::Write;

use qrcode::{Color, QrCode};

const TABLE_OPEN: &str =
    r#"<table cellpadding="0" cellspacing="0" border="0" style="border-collapse: collapse;">"#;

/// Encode `text` and lay the modules out as one table cell each.
pub(super) fn qr_table(text: &str, dot_size: u32) -> Result<String, String> {
    let code = QrCode::new(text.as_bytes()).map_err(|e| format!("qr: {e}"))?;
    let width = code.width();
    let colors = code.to_colors();

    let mut html = String::from(TABLE_OPEN);
    for row in colors.chunks(width) {
        html.push_str("<tr>");
        for color in row {
            let bg = if *color == Color::Dark { "#000000" } else { "#FFFFFF" };
            let _ = write!(
                html,
                r#"<td width="{dot_size}" height="{dot_size}" bgcolor="{bg}" style="padding:0; margin:0; font-size:0; line-height:0; width:{dot_size}px; height:{dot_size}px; min-width:{dot_size}px; min-height:{dot_size}px; "></td>"#
            );
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");

    Ok(html)
}
