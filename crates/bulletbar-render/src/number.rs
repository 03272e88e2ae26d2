/// Stringifies a number the way a JS `Number#toString()` would, which is what lands in SVG
/// attributes and legend text when the values come from the browser.
///
/// Rust's float `Display` can pick a different shortest round-trippable decimal on tie cases,
/// so this goes through `ryu_js`.
pub fn fmt_js(v: f64) -> String {
    let mut buf = ryu_js::Buffer::new();
    js_number_to_string(v, &mut buf).to_string()
}

fn js_number_to_string(mut v: f64, buf: &mut ryu_js::Buffer) -> &str {
    if !v.is_finite() {
        return "0";
    }
    if v == -0.0 {
        v = 0.0;
    }
    buf.format_finite(v)
}
