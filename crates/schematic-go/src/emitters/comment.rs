const MAX_LINE: usize = 70;

/// Turn free text into `//` comment lines, wrapping at the last space before
/// column 70. Embedded newlines are kept.
pub fn as_comment(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    while !rest.is_empty() {
        let Some((cut, _)) = rest.char_indices().nth(MAX_LINE) else {
            push_line(&mut out, rest);
            break;
        };
        let window = &rest[..cut];
        match window.rfind(' ') {
            Some(space) => {
                push_line(&mut out, &window[..space]);
                rest = &rest[space + 1..];
            }
            None => {
                push_line(&mut out, window);
                rest = &rest[cut..];
            }
        }
    }
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str("// ");
    out.push_str(&line.replace('\n', "\n// "));
    out.push('\n');
}
