//! Minimal XML construction and extraction helpers.
//!
//! The ProcessData service consumes small, flat XML documents. Rather than
//! interpolating caller-supplied strings directly into the payload, every
//! value goes through explicit escaping (attributes, text) or CDATA wrapping
//! (SQL text, tag names), so a tag name containing `"` or `]]>` cannot break
//! out of the element it was written into.

use std::borrow::Cow;

/// Escape a string for use inside a double-quoted XML attribute value.
#[must_use]
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Escape a string for use as XML element text.
#[must_use]
pub fn escape_text(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Undo the entity escaping applied by [`escape_text`] plus the two quote
/// entities, in the order that keeps `&amp;lt;` from double-decoding.
#[must_use]
pub fn unescape_text(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Write `value` into `out` as a CDATA section.
///
/// A literal `]]>` inside the value would terminate the section early, so it
/// is split across two adjacent sections (`]]]]><![CDATA[>`), which the
/// receiver reassembles transparently.
pub fn write_cdata(out: &mut String, value: &str) {
    out.push_str("<![CDATA[");
    let mut rest = value;
    while let Some(pos) = rest.find("]]>") {
        out.push_str(&rest[..pos + 2]);
        out.push_str("]]><![CDATA[");
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out.push_str("]]>");
}

/// Write `<name>text</name>` with text escaping.
pub fn write_text_element(out: &mut String, name: &str, text: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    out.push_str(&escape_text(text));
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Write `<name><![CDATA[text]]></name>`.
pub fn write_cdata_element(out: &mut String, name: &str, text: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    write_cdata(out, text);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Extract the raw text content of the first `<name>` element in `xml`.
///
/// This is deliberately not a full XML parser. The SOAP responses this is
/// used on are flat documents produced by the vendor's .asmx service, and the
/// only thing the client needs out of them is the text of a single result
/// element. Returns `None` when the element is absent or unterminated.
#[must_use]
pub fn element_text<'a>(xml: &'a str, name: &str) -> Option<&'a str> {
    let mut search = xml;
    loop {
        let open_at = search.find(&format!("<{name}"))?;
        let after_open = &search[open_at + name.len() + 1..];
        // Reject partial matches such as <NameSuffix ...>.
        match after_open.chars().next() {
            Some('>') | Some(' ') | Some('\t') | Some('\r') | Some('\n') | Some('/') => {}
            _ => {
                search = after_open;
                continue;
            }
        }
        let gt = after_open.find('>')?;
        if after_open[..gt].trim_end().ends_with('/') {
            return Some("");
        }
        let body = &after_open[gt + 1..];
        let end = body.find(&format!("</{name}>"))?;
        return Some(&body[..end]);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn attr_escaping() {
        assert_eq!(escape_attr("plain"), "plain");
        assert_eq!(escape_attr(r#"a"b<c>&"#), "a&quot;b&lt;c&gt;&amp;");
    }

    #[test]
    fn text_escaping_roundtrip() {
        let original = "1 < 2 & \"quoted\"";
        assert_eq!(unescape_text(&escape_text(original)), original);
    }

    #[test]
    fn cdata_plain() {
        let mut out = String::new();
        write_cdata(&mut out, "SELECT * FROM IP_AnalogDef");
        assert_eq!(out, "<![CDATA[SELECT * FROM IP_AnalogDef]]>");
    }

    #[test]
    fn cdata_with_terminator() {
        let mut out = String::new();
        write_cdata(&mut out, "a]]>b");
        // Split across two sections; concatenated content is unchanged.
        assert_eq!(out, "<![CDATA[a]]]]><![CDATA[>b]]>");
    }

    #[test]
    fn element_text_simple() {
        let xml = "<r><Inner>hello</Inner></r>";
        assert_eq!(element_text(xml, "Inner"), Some("hello"));
    }

    #[test]
    fn element_text_with_attributes() {
        let xml = r#"<Result xmlns="urn:x">payload</Result>"#;
        assert_eq!(element_text(xml, "Result"), Some("payload"));
    }

    #[test]
    fn element_text_self_closing() {
        assert_eq!(element_text("<a><Empty/></a>", "Empty"), Some(""));
    }

    #[test]
    fn element_text_skips_prefix_matches() {
        let xml = "<ResultSet>no</ResultSet><Result>yes</Result>";
        assert_eq!(element_text(xml, "Result"), Some("yes"));
    }

    #[test]
    fn element_text_missing() {
        assert_eq!(element_text("<a>x</a>", "b"), None);
    }
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    /// Reassemble CDATA section contents the way an XML parser would.
    fn cdata_content(encoded: &str) -> String {
        let mut out = String::new();
        let mut rest = encoded;
        while let Some(start) = rest.find("<![CDATA[") {
            rest = &rest[start + "<![CDATA[".len()..];
            let end = rest.find("]]>").unwrap_or(rest.len());
            out.push_str(&rest[..end]);
            rest = rest.get(end + "]]>".len()..).unwrap_or("");
        }
        out
    }

    proptest! {
        #[test]
        fn cdata_roundtrips(value in ".*") {
            let mut out = String::new();
            write_cdata(&mut out, &value);
            prop_assert_eq!(cdata_content(&out), value);
        }

        #[test]
        fn cdata_sections_never_contain_terminator(value in ".*") {
            let mut out = String::new();
            write_cdata(&mut out, &value);
            for chunk in out.split("<![CDATA[").skip(1) {
                let inner = chunk.strip_suffix("]]>").unwrap_or(chunk);
                prop_assert!(!inner.contains("]]>"));
            }
        }

        #[test]
        fn escaped_text_roundtrips(value in ".*") {
            prop_assert_eq!(unescape_text(&escape_text(&value)), value);
        }

        #[test]
        fn escaped_attr_has_no_raw_quotes(value in ".*") {
            let escaped = escape_attr(&value);
            prop_assert!(!escaped.contains('"'));
            prop_assert!(!escaped.contains('<'));
        }
    }
}
