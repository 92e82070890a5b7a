//! Indented nginx directive writer and argument quoting.

use std::borrow::Cow;

const INDENT: &str = "    ";

/// Builds nginx configuration text one directive at a time.
#[derive(Debug, Default)]
pub struct NginxWriter {
    out: String,
    depth: usize,
}

impl NginxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn head<I, S>(&mut self, name: &str, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.indent();
        self.out.push_str(name);
        for a in args {
            self.out.push(' ');
            self.out.push_str(a.as_ref());
        }
    }

    /// Write `name arg1 arg2;`. Arguments are written as given; use
    /// [`arg`] or [`quote`] for values that may need quoting.
    pub fn directive<I, S>(&mut self, name: &str, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.head(name, args);
        self.out.push_str(";\n");
    }

    /// Write `name args { ... }` with the body produced by `body`.
    pub fn block<I, S, F>(&mut self, name: &str, args: I, body: F)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnOnce(&mut Self),
    {
        self.head(name, args);
        self.out.push_str(" {\n");
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.indent();
        self.out.push_str("}\n");
    }

    /// Write a `#` comment. Control characters are flattened to spaces so
    /// a comment can never spill onto a directive line.
    pub fn comment(&mut self, text: &str) {
        self.indent();
        self.out.push_str("# ");
        self.out
            .extend(text.chars().map(|c| if c.is_control() { ' ' } else { c }));
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }
}

fn needs_quotes(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '\'' | ';' | '{' | '}' | '\\' | '#')
}

/// Quote `value` as an nginx string.
///
/// Double quotes are used unless the value contains a double quote and no
/// single quote. Backslashes and the chosen quote character are escaped.
pub fn quote(value: &str) -> String {
    let q = if value.contains('"') && !value.contains('\'') {
        '\''
    } else {
        '"'
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(q);
    for c in value.chars() {
        if c == '\\' || c == q {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(q);
    out
}

/// `value` as a bare word when that is safe, quoted otherwise.
pub fn arg(value: &str) -> Cow<'_, str> {
    if value.is_empty() || value.contains(needs_quotes) {
        Cow::Owned(quote(value))
    } else {
        Cow::Borrowed(value)
    }
}

/// Escape PCRE metacharacters so `value` matches literally in a regex.
pub fn regex_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_and_indent() {
        let mut w = NginxWriter::new();
        w.block("server", None::<&str>, |w| {
            w.directive("listen", ["8099"]);
            w.block("location", ["/x/"], |w| {
                w.directive("deny", ["all"]);
            });
        });
        assert_eq!(
            w.finish(),
            "server {\n    listen 8099;\n    location /x/ {\n        deny all;\n    }\n}\n"
        );
    }

    #[test]
    fn test_comment_flattens_newlines() {
        let mut w = NginxWriter::new();
        w.comment("evil\n}\nserver {");
        assert_eq!(w.finish(), "# evil } server {\n");
    }

    #[test]
    fn test_quote_picks_quote_style() {
        assert_eq!(quote("no-cache"), "\"no-cache\"");
        assert_eq!(quote("src=\"/"), "'src=\"/'");
        assert_eq!(quote("src='/"), "\"src='/\"");
        assert_eq!(quote("\\\"/"), "'\\\\\"/'");
        assert_eq!(quote("\\'/"), "\"\\\\'/\"");
        assert_eq!(quote("a\"b'c"), "\"a\\\"b'c\"");
    }

    #[test]
    fn test_arg_bare_when_safe() {
        assert_eq!(arg("/grafana/"), "/grafana/");
        assert_eq!(arg("$http_upgrade"), "$http_upgrade");
        assert_eq!(arg(""), "\"\"");
        assert_eq!(arg("no-store, max-age=0"), "\"no-store, max-age=0\"");
    }

    #[test]
    fn test_regex_escape() {
        assert_eq!(regex_escape("/my.app"), "/my\\.app");
        assert_eq!(regex_escape("/a+b(c)"), "/a\\+b\\(c\\)");
        assert_eq!(regex_escape("/plain-path"), "/plain-path");
    }
}
