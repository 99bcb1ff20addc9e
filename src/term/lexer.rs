use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip(r"%[^\n]*", allow_greedy = true))]
pub enum Token {
    #[token("fun")]
    Fun,

    // Punctuation
    #[token("<<")]
    BinOpen,
    #[token(">>")]
    BinClose,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("#{")]
    MapOpen,
    #[token("=>")]
    Arrow,
    #[token(",")]
    Comma,
    #[token("|")]
    Pipe,
    #[token(":")]
    Colon,
    #[token("/")]
    Slash,

    // Opaque handles are single tokens so `<` never has to be lexed alone.
    #[regex(r"<[0-9]+\.[0-9]+\.[0-9]+>", |lex| parse_dotted(lex.slice(), "<"))]
    Pid(Vec<u32>),
    #[regex(r"#Ref<[0-9]+(\.[0-9]+)*>", |lex| parse_dotted(lex.slice(), "#Ref<"))]
    Ref(Vec<u32>),
    #[regex(r"#Port<[0-9]+\.[0-9]+>", |lex| parse_dotted(lex.slice(), "#Port<"))]
    Port(Vec<u32>),

    // Literals
    #[regex(r"-?[0-9]+\.[0-9]+([eE][-+]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),

    #[regex(r"\$[^\\]", |lex| lex.slice().chars().nth(1).map(|c| c as i64))]
    Char(i64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    Str(String),

    #[regex(r"[a-z][A-Za-z0-9_@]*", |lex| lex.slice().to_string())]
    #[regex(r"'([^'\\]|\\.)*'", |lex| unescape(lex.slice()))]
    Atom(String),
}

fn parse_dotted(slice: &str, prefix: &str) -> Option<Vec<u32>> {
    slice
        .strip_prefix(prefix)?
        .strip_suffix('>')?
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect()
}

/// Strip the surrounding quotes and resolve backslash escapes.
fn unescape(slice: &str) -> Option<String> {
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            's' => out.push(' '),
            'e' => out.push('\u{1b}'),
            '0' => out.push('\0'),
            other => out.push(other),
        }
    }
    Some(out)
}

/// Lex term source text into tokens with byte ranges.
pub fn lex(source: &str) -> Result<Vec<(Token, std::ops::Range<usize>)>, LexError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                let span = lexer.span();
                return Err(LexError {
                    position: span.start,
                    snippet: source[span].to_string(),
                });
            }
        }
    }

    Ok(tokens)
}

#[derive(Debug, thiserror::Error)]
#[error("unexpected input at position {position}: '{snippet}'")]
pub struct LexError {
    pub position: usize,
    pub snippet: String,
}
