//! URL 模板解析与替换
//!
//! 占位符形如 `$name`，`name` 匹配 `[a-z][a-z0-9_]*`（贪婪）。
//! `$` 后面不是小写字母时按字面量处理。

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// 同名占位符出现多次
    DuplicatePlaceholder(String),
    /// 路径剩余段数与占位符数量不一致
    ArityMismatch { expected: usize, got: usize },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::DuplicatePlaceholder(name) => {
                write!(f, "placeholder ${} appears more than once", name)
            }
            TemplateError::ArityMismatch { expected, got } => {
                write!(f, "expected {} segment(s), got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for TemplateError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// A parsed destination template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate<'a> {
    pieces: Vec<Piece<'a>>,
    placeholders: Vec<&'a str>,
}

impl<'a> UrlTemplate<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, TemplateError> {
        let bytes = raw.as_bytes();
        let mut pieces = Vec::new();
        let mut placeholders: Vec<&'a str> = Vec::new();
        let mut literal_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'$' && bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase) {
                let name_start = i + 1;
                let mut end = name_start + 1;
                while end < bytes.len()
                    && (bytes[end].is_ascii_lowercase()
                        || bytes[end].is_ascii_digit()
                        || bytes[end] == b'_')
                {
                    end += 1;
                }

                let name = &raw[name_start..end];
                if placeholders.contains(&name) {
                    return Err(TemplateError::DuplicatePlaceholder(name.to_string()));
                }
                if literal_start < i {
                    pieces.push(Piece::Literal(&raw[literal_start..i]));
                }
                pieces.push(Piece::Placeholder(name));
                placeholders.push(name);

                i = end;
                literal_start = end;
            } else {
                i += 1;
            }
        }
        if literal_start < bytes.len() {
            pieces.push(Piece::Literal(&raw[literal_start..]));
        }

        Ok(Self {
            pieces,
            placeholders,
        })
    }

    /// 按首次出现顺序排列的占位符名称
    pub fn placeholders(&self) -> &[&'a str] {
        &self.placeholders
    }

    pub fn has_placeholders(&self) -> bool {
        !self.placeholders.is_empty()
    }

    /// 按位置替换占位符，每个值都会做百分号编码
    ///
    /// 没有占位符的模板忽略全部参数，原样返回。
    pub fn render(&self, args: &[&str]) -> Result<String, TemplateError> {
        if !self.has_placeholders() {
            return Ok(self.literal_text());
        }
        if args.len() != self.placeholders.len() {
            return Err(TemplateError::ArityMismatch {
                expected: self.placeholders.len(),
                got: args.len(),
            });
        }

        let mut out = String::new();
        let mut next_arg = args.iter();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Placeholder(_) => {
                    if let Some(value) = next_arg.next() {
                        out.push_str(&urlencoding::encode(value));
                    }
                }
            }
        }
        Ok(out)
    }

    fn literal_text(&self) -> String {
        self.pieces
            .iter()
            .map(|p| match p {
                Piece::Literal(text) | Piece::Placeholder(text) => *text,
            })
            .collect()
    }
}
