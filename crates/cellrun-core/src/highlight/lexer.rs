//! A small C/C++/CUDA lexer for highlighting.
//!
//! Lexing is lossless: concatenating the token texts reproduces the input
//! exactly. Anything unrecognised becomes [`TokenKind::Text`].

/// Token category, named after the CSS class it renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    Preproc,
    String,
    Char,
    Number,
    Keyword,
    Type,
    Builtin,
    Name,
    Operator,
    Punct,
    Whitespace,
    Text,
}

impl TokenKind {
    /// CSS class, following the short Pygments class names.
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Self::Comment => Some("c"),
            Self::Preproc => Some("cp"),
            Self::String => Some("s"),
            Self::Char => Some("sc"),
            Self::Number => Some("m"),
            Self::Keyword => Some("k"),
            Self::Type => Some("kt"),
            Self::Builtin => Some("nb"),
            Self::Name => Some("n"),
            Self::Operator => Some("o"),
            Self::Punct => Some("p"),
            Self::Whitespace | Self::Text => None,
        }
    }
}

const KEYWORDS: &[&str] = &[
    "alignas", "alignof", "asm", "auto", "break", "case", "catch", "class", "const",
    "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await", "co_return",
    "co_yield", "decltype", "default", "delete", "do", "dynamic_cast", "else", "enum",
    "explicit", "export", "extern", "false", "for", "friend", "goto", "if", "inline",
    "mutable", "namespace", "new", "noexcept", "nullptr", "operator", "private", "protected",
    "public", "register", "reinterpret_cast", "requires", "return", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "using", "virtual",
    "volatile", "while",
];

const TYPES: &[&str] = &[
    "bool", "char", "char8_t", "char16_t", "char32_t", "double", "float", "int", "long",
    "short", "signed", "unsigned", "void", "wchar_t", "size_t", "ptrdiff_t", "int8_t",
    "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t", "dim3",
    "cudaError_t", "cudaStream_t", "cudaEvent_t",
];

const CUDA_BUILTINS: &[&str] = &[
    "__global__", "__device__", "__host__", "__shared__", "__constant__", "__managed__",
    "__restrict__", "__syncthreads", "__forceinline__", "threadIdx", "blockIdx", "blockDim",
    "gridDim", "warpSize",
];

const OPERATOR_CHARS: &str = "+-*/%=<>!&|^~?:";
const PUNCT_CHARS: &str = "()[]{};,.";

/// Split `source` into highlighted tokens.
pub fn tokenize(source: &str) -> Vec<(TokenKind, &str)> {
    let mut lexer = Lexer {
        src: source,
        pos: 0,
        line_start: true,
    };
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }

    tokens
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    /// Only whitespace seen since the last newline.
    line_start: bool,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    /// Advance while `pred` holds.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn next_token(&mut self) -> Option<(TokenKind, &'a str)> {
        let start = self.pos;
        let c = self.peek()?;
        let at_line_start = self.line_start;
        self.line_start = false;

        let kind = if c.is_whitespace() {
            self.eat_while(char::is_whitespace);
            let text = &self.src[start..self.pos];
            self.line_start = at_line_start || text.contains('\n');
            TokenKind::Whitespace
        } else if self.rest().starts_with("//") {
            self.eat_while(|c| c != '\n');
            TokenKind::Comment
        } else if self.rest().starts_with("/*") {
            match self.rest()[2..].find("*/") {
                Some(end) => self.pos += 2 + end + 2,
                None => self.pos = self.src.len(),
            }
            TokenKind::Comment
        } else if c == '#' && at_line_start {
            self.lex_preproc();
            TokenKind::Preproc
        } else if c == '"' {
            self.lex_quoted('"');
            TokenKind::String
        } else if c == '\'' {
            self.lex_quoted('\'');
            TokenKind::Char
        } else if c.is_ascii_digit()
            || (c == '.' && self.peek_second().is_some_and(|c| c.is_ascii_digit()))
        {
            self.lex_number();
            TokenKind::Number
        } else if c == '_' || c.is_alphabetic() {
            self.eat_while(|c| c == '_' || c.is_alphanumeric());
            let word = &self.src[start..self.pos];
            if matches!(self.peek(), Some('"' | '\'')) && is_literal_prefix(word) {
                let quote = self.peek().unwrap_or('"');
                self.lex_quoted(quote);
                if quote == '"' { TokenKind::String } else { TokenKind::Char }
            } else {
                classify_word(word)
            }
        } else if OPERATOR_CHARS.contains(c) {
            self.eat_while(|c| OPERATOR_CHARS.contains(c));
            TokenKind::Operator
        } else if PUNCT_CHARS.contains(c) {
            self.pos += c.len_utf8();
            TokenKind::Punct
        } else {
            self.pos += c.len_utf8();
            TokenKind::Text
        };

        Some((kind, &self.src[start..self.pos]))
    }

    /// Preprocessor line, following backslash continuations.
    fn lex_preproc(&mut self) {
        loop {
            self.eat_while(|c| c != '\n');
            if self.src[..self.pos].ends_with('\\') && self.peek() == Some('\n') {
                self.pos += 1;
                continue;
            }
            break;
        }
    }

    /// String or char literal; stops at the closing quote or end of line.
    fn lex_quoted(&mut self, quote: char) {
        self.pos += quote.len_utf8();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.pos += 1;
                    if let Some(next) = self.peek() {
                        self.pos += next.len_utf8();
                    }
                }
                '\n' => return,
                c if c == quote => {
                    self.pos += c.len_utf8();
                    return;
                }
                c => self.pos += c.len_utf8(),
            }
        }
    }

    fn lex_number(&mut self) {
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let exponent_sign =
                (c == '+' || c == '-') && matches!(prev, 'e' | 'E' | 'p' | 'P');
            if !(c.is_ascii_alphanumeric() || c == '.' || c == '\'' || c == '_' || exponent_sign)
            {
                break;
            }
            prev = c;
            self.pos += 1;
        }
    }
}

fn is_literal_prefix(word: &str) -> bool {
    matches!(word, "L" | "u" | "U" | "u8")
}

fn classify_word(word: &str) -> TokenKind {
    if KEYWORDS.contains(&word) {
        TokenKind::Keyword
    } else if TYPES.contains(&word) {
        TokenKind::Type
    } else if CUDA_BUILTINS.contains(&word) {
        TokenKind::Builtin
    } else {
        TokenKind::Name
    }
}
