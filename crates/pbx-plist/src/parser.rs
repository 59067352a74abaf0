//! Recursive-descent parser for ASCII plist text.
//!
//! Comments are skipped wherever whitespace is allowed. Bare strings may
//! contain `/` (paths are written unquoted), so a `/` only starts a comment
//! when it is followed by `*` or `/`.

use crate::error::{PlistError, PlistResult};
use crate::value::{PlistDict, PlistKey, PlistValue};

/// Parse a complete plist document.
///
/// Leading `// ...` lines (the UTF-8 header the IDE writes) are comments and
/// are skipped like any other.
pub fn parse(text: &str) -> PlistResult<PlistValue> {
    let mut parser = Parser::new(text);
    parser.skip_trivia()?;
    let value = parser.parse_value()?;
    parser.skip_trivia()?;
    if parser.peek().is_some() {
        return Err(PlistError::TrailingContent {
            line: parser.line,
            column: parser.column,
        });
    }
    tracing::trace!(bytes = text.len(), "parsed plist document");
    Ok(value)
}

/// Characters allowed in an unquoted string.
pub(crate) fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '/' | ':' | '.' | '-' | '+')
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn syntax(&self, message: impl Into<String>) -> PlistError {
        PlistError::Syntax {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    /// Skip whitespace and both comment forms.
    fn skip_trivia(&mut self) -> PlistResult<()> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('*')) => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    loop {
                        match (self.peek(), self.peek_at(1)) {
                            (Some('*'), Some('/')) => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            (Some(_), _) => {
                                self.bump();
                            }
                            (None, _) => {
                                return Err(PlistError::UnterminatedComment { line, column });
                            }
                        }
                    }
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn expect(&mut self, wanted: char, expected: &'static str) -> PlistResult<()> {
        self.skip_trivia()?;
        match self.peek() {
            Some(c) if c == wanted => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.syntax(format!("expected {expected}, found {c:?}"))),
            None => Err(PlistError::UnexpectedEof { expected }),
        }
    }

    fn parse_value(&mut self) -> PlistResult<PlistValue> {
        self.skip_trivia()?;
        match self.peek() {
            Some('{') => self.parse_dict().map(PlistValue::Dict),
            Some('(') => self.parse_array(),
            Some(_) => self.parse_string().map(PlistValue::String),
            None => Err(PlistError::UnexpectedEof { expected: "a value" }),
        }
    }

    fn parse_dict(&mut self) -> PlistResult<PlistDict> {
        self.expect('{', "'{'")?;
        let mut dict = PlistDict::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(dict);
                }
                None => return Err(PlistError::UnexpectedEof { expected: "'}'" }),
                Some(_) => {}
            }
            let key = self.parse_string()?;
            self.expect('=', "'='")?;
            let value = self.parse_value()?;
            self.expect(';', "';'")?;
            dict.insert(PlistKey::new(key), value);
        }
    }

    fn parse_array(&mut self) -> PlistResult<PlistValue> {
        self.expect('(', "'('")?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(')') => {
                    self.bump();
                    return Ok(PlistValue::Array(items));
                }
                None => return Err(PlistError::UnexpectedEof { expected: "')'" }),
                Some(_) => {}
            }
            items.push(self.parse_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(')') => {}
                Some(c) => return Err(self.syntax(format!("expected ',' or ')', found {c:?}"))),
                None => return Err(PlistError::UnexpectedEof { expected: "')'" }),
            }
        }
    }

    fn parse_string(&mut self) -> PlistResult<String> {
        self.skip_trivia()?;
        match self.peek() {
            Some('"') | Some('\'') => self.parse_quoted(),
            Some(c) if is_bare_char(c) => Ok(self.parse_bare()),
            Some(c) => Err(self.syntax(format!("unexpected character {c:?}"))),
            None => Err(PlistError::UnexpectedEof { expected: "a string" }),
        }
    }

    fn parse_bare(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !is_bare_char(c) {
                break;
            }
            if c == '/' && matches!(self.peek_at(1), Some('*') | Some('/')) {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    fn parse_quoted(&mut self) -> PlistResult<String> {
        let Some(quote) = self.bump() else {
            return Err(PlistError::UnexpectedEof { expected: "a quote" });
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(PlistError::UnexpectedEof { expected: "closing quote" }),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push(self.parse_escape()?),
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self) -> PlistResult<char> {
        let Some(c) = self.bump() else {
            return Err(PlistError::UnexpectedEof { expected: "escape sequence" });
        };
        Ok(match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            'U' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = self
                        .bump()
                        .and_then(|d| d.to_digit(16))
                        .ok_or_else(|| self.syntax("invalid \\U escape"))?;
                    code = code * 16 + digit;
                }
                char::from_u32(code).ok_or_else(|| self.syntax("invalid \\U code point"))?
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(text: &str) -> PlistDict {
        parse(text).unwrap().into_dict().unwrap()
    }

    #[test]
    fn empty_dict() {
        assert!(dict("{}").is_empty());
    }

    #[test]
    fn bare_and_quoted_strings() {
        let d = dict(r#"{ path = Sources/main.swift; sourceTree = "<group>"; }"#);
        assert_eq!(d.get("path").and_then(PlistValue::as_str), Some("Sources/main.swift"));
        assert_eq!(d.get("sourceTree").and_then(PlistValue::as_str), Some("<group>"));
    }

    #[test]
    fn arrays_accept_trailing_comma() {
        let d = dict("{ files = ( A, B, ); other = (A, B); empty = ( ); }");
        let expected = PlistValue::Array(vec!["A".into(), "B".into()]);
        assert_eq!(d.get("files"), Some(&expected));
        assert_eq!(d.get("other"), Some(&expected));
        assert_eq!(d.get("empty"), Some(&PlistValue::Array(vec![])));
    }

    #[test]
    fn comments_are_skipped() {
        let text = "// !$*UTF8*$!\n{\n\tfiles = (\n\t\tA /* main.swift in Sources */,\n\t);\n\t// note\n\tname = x; /* trailing */\n}\n";
        let d = dict(text);
        assert_eq!(
            d.get("files"),
            Some(&PlistValue::Array(vec!["A".into()]))
        );
        assert_eq!(d.get("name").and_then(PlistValue::as_str), Some("x"));
    }

    #[test]
    fn commented_key() {
        let d = dict("{ ABC /* Sources */ = { isa = PBXSourcesBuildPhase; }; }");
        let inner = d.get("ABC").and_then(PlistValue::as_dict).unwrap();
        assert_eq!(
            inner.get("isa").and_then(PlistValue::as_str),
            Some("PBXSourcesBuildPhase")
        );
    }

    #[test]
    fn escapes() {
        let d = dict(r#"{ script = "echo \"hi\"\n\tdone\\"; u = "\U00e9"; }"#);
        assert_eq!(
            d.get("script").and_then(PlistValue::as_str),
            Some("echo \"hi\"\n\tdone\\")
        );
        assert_eq!(d.get("u").and_then(PlistValue::as_str), Some("é"));
    }

    #[test]
    fn path_with_slashes_is_not_a_comment() {
        let d = dict("{ path = a/b/c.h; }");
        assert_eq!(d.get("path").and_then(PlistValue::as_str), Some("a/b/c.h"));
    }

    #[test]
    fn nested_dicts() {
        let d = dict("{ buildSettings = { SDKROOT = iphoneos; ONLY = ( a ); }; }");
        let settings = d.get("buildSettings").and_then(PlistValue::as_dict).unwrap();
        assert_eq!(settings.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[test]
    fn missing_semicolon() {
        let err = parse("{ a = b }").unwrap_err();
        assert!(matches!(err, PlistError::Syntax { .. }), "{err:?}");
    }

    #[test]
    fn unterminated_dict() {
        let err = parse("{ a = b;").unwrap_err();
        assert_eq!(err, PlistError::UnexpectedEof { expected: "'}'" });
    }

    #[test]
    fn unterminated_comment() {
        let err = parse("{ /* never closed }").unwrap_err();
        assert!(matches!(err, PlistError::UnterminatedComment { line: 1, column: 3 }));
    }

    #[test]
    fn trailing_content() {
        let err = parse("{ } extra").unwrap_err();
        assert!(matches!(err, PlistError::TrailingContent { .. }));
    }

    #[test]
    fn error_reports_line() {
        let err = parse("{\n\ta = b;\n\tc = ;\n}").unwrap_err();
        match err {
            PlistError::Syntax { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
