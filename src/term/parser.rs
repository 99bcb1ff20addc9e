use super::lexer::{self, Token};
use super::{Bitstring, Pid, Span, Term};

/// Deepest nesting of lists, tuples, maps and binaries accepted.
pub const MAX_DEPTH: usize = 256;

pub struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    depth: usize,
}

#[derive(Debug, thiserror::Error)]
#[error("term parse error at {}: {message}", span.start)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
}

impl From<lexer::LexError> for ParseError {
    fn from(e: lexer::LexError) -> Self {
        ParseError {
            span: Span { start: e.position, end: e.position + e.snippet.len().max(1) },
            message: format!("unexpected input '{}'", e.snippet),
        }
    }
}

type Result<T> = std::result::Result<T, ParseError>;

impl Parser {
    pub fn new(tokens: Vec<(Token, Span)>) -> Self {
        Parser { tokens, pos: 0, depth: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|(_, s)| *s)
            .or_else(|| self.tokens.last().map(|(_, s)| Span { start: s.end, end: s.end }))
            .unwrap_or(Span::UNKNOWN)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        match self.peek() {
            Some(tok) if tok == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(tok) => Err(self.error(format!("expected {:?}, got {:?}", expected, tok))),
            None => Err(self.error(format!("expected {:?}, got end of input", expected))),
        }
    }

    fn error(&self, message: String) -> ParseError {
        ParseError { span: self.peek_span(), message }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn term(&mut self) -> Result<Term> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("terms nested deeper than {MAX_DEPTH} levels")));
        }
        self.depth += 1;
        let result = self.value();
        self.depth -= 1;
        result
    }

    fn value(&mut self) -> Result<Term> {
        let span = self.peek_span();
        let tok = self
            .advance()
            .ok_or_else(|| self.error("expected a term, got end of input".into()))?;
        match tok {
            Token::Integer(n) => Ok(Term::Integer(n)),
            Token::Float(x) => Ok(Term::Float(x)),
            Token::Char(c) => Ok(Term::Integer(c)),
            Token::Str(s) => Ok(Term::string(&s)),
            Token::Atom(a) => Ok(Term::Atom(a)),
            Token::Pid(parts) => Ok(Term::Pid(Pid { node: parts[0], id: parts[1], serial: parts[2] })),
            Token::Port(parts) => Ok(Term::Port(parts[0], parts[1])),
            Token::Ref(parts) => Ok(Term::Reference(parts)),
            Token::LBracket => self.list_rest(),
            Token::LBrace => {
                let items = self.sequence(&Token::RBrace)?;
                Ok(Term::Tuple(items))
            }
            Token::MapOpen => self.map_rest(),
            Token::BinOpen => self.binary_rest(),
            Token::Fun => self.fun_rest(),
            other => Err(ParseError { span, message: format!("expected a term, got {:?}", other) }),
        }
    }

    /// Comma-separated terms up to (and consuming) `close`.
    fn sequence(&mut self, close: &Token) -> Result<Vec<Term>> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.term()?);
            if self.eat(close) {
                return Ok(items);
            }
            self.expect(&Token::Comma)?;
        }
    }

    fn list_rest(&mut self) -> Result<Term> {
        let mut items = Vec::new();
        if self.eat(&Token::RBracket) {
            return Ok(Term::nil());
        }
        loop {
            items.push(self.term()?);
            if self.eat(&Token::RBracket) {
                return Ok(Term::List(items));
            }
            if self.eat(&Token::Pipe) {
                let tail = self.term()?;
                self.expect(&Token::RBracket)?;
                return Ok(Term::cons(items, tail));
            }
            self.expect(&Token::Comma)?;
        }
    }

    fn map_rest(&mut self) -> Result<Term> {
        let mut pairs = Vec::new();
        if self.eat(&Token::RBrace) {
            return Ok(Term::Map(pairs));
        }
        loop {
            let key = self.term()?;
            self.expect(&Token::Arrow)?;
            let value = self.term()?;
            // Later associations win, as in a map literal.
            pairs.retain(|(k, _): &(Term, Term)| *k != key);
            pairs.push((key, value));
            if self.eat(&Token::RBrace) {
                return Ok(Term::Map(pairs));
            }
            self.expect(&Token::Comma)?;
        }
    }

    fn binary_rest(&mut self) -> Result<Term> {
        let mut bits = BitWriter::default();
        if self.eat(&Token::BinClose) {
            return Ok(Term::Bitstring(bits.finish()));
        }
        loop {
            match self.advance() {
                Some(Token::Str(s)) => {
                    for b in s.bytes() {
                        bits.push(b as u64, 8);
                    }
                }
                Some(Token::Integer(n)) => {
                    let size = if self.eat(&Token::Colon) {
                        match self.advance() {
                            Some(Token::Integer(size)) if (1..=64).contains(&size) => size as u32,
                            _ => return Err(self.error("expected a segment size between 1 and 64".into())),
                        }
                    } else {
                        8
                    };
                    bits.push(n as u64, size);
                }
                Some(Token::Char(c)) => bits.push(c as u64, 8),
                _ => return Err(self.error("expected a binary segment".into())),
            }
            if self.eat(&Token::BinClose) {
                return Ok(Term::Bitstring(bits.finish()));
            }
            self.expect(&Token::Comma)?;
        }
    }

    /// `fun Name/Arity` or `fun Module:Name/Arity`.
    fn fun_rest(&mut self) -> Result<Term> {
        let first = match self.advance() {
            Some(Token::Atom(a)) => a,
            _ => return Err(self.error("expected a function name after 'fun'".into())),
        };
        let (module, name) = if self.eat(&Token::Colon) {
            match self.advance() {
                Some(Token::Atom(name)) => (Some(first), name),
                _ => return Err(self.error("expected a function name after ':'".into())),
            }
        } else {
            (None, first)
        };
        self.expect(&Token::Slash)?;
        match self.advance() {
            Some(Token::Integer(arity)) if (0..=255).contains(&arity) => {
                Ok(Term::Fun { module, name, arity: arity as u32 })
            }
            _ => Err(self.error("expected an arity between 0 and 255".into())),
        }
    }
}

/// Packs segments most-significant bit first.
#[derive(Default)]
struct BitWriter {
    bits: Vec<bool>,
}

impl BitWriter {
    fn push(&mut self, value: u64, size: u32) {
        for shift in (0..size).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }
    }

    fn finish(self) -> Bitstring {
        let mut bytes = Vec::with_capacity(self.bits.len().div_ceil(8));
        let chunks = self.bits.chunks(8);
        let mut trailing_bits = 0u8;
        for chunk in chunks {
            let value = chunk.iter().fold(0u8, |acc, bit| (acc << 1) | *bit as u8);
            if chunk.len() < 8 {
                trailing_bits = chunk.len() as u8;
            }
            bytes.push(value);
        }
        Bitstring { bytes, trailing_bits }
    }
}

fn spanned(source: &str) -> Result<Vec<(Token, Span)>> {
    Ok(lexer::lex(source)?
        .into_iter()
        .map(|(t, r)| (t, Span { start: r.start, end: r.end }))
        .collect())
}

/// Parse exactly one term from `source`.
pub fn parse_term(source: &str) -> Result<Term> {
    let mut parser = Parser::new(spanned(source)?);
    let term = parser.term()?;
    if !parser.at_end() {
        return Err(parser.error("trailing input after term".into()));
    }
    Ok(term)
}

/// Parse an argument list: a list literal such as `[<<1,2>>, 3]`.
pub fn parse_terms(source: &str) -> Result<Vec<Term>> {
    match parse_term(source)? {
        Term::List(items) => Ok(items),
        other => Err(ParseError {
            span: Span { start: 0, end: source.len() },
            message: format!("expected an argument list, got {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scalars() {
        assert_eq!(parse_term("42").unwrap(), Term::int(42));
        assert_eq!(parse_term("-4").unwrap(), Term::int(-4));
        assert_eq!(parse_term("2.5").unwrap(), Term::Float(2.5));
        assert_eq!(parse_term("ok").unwrap(), Term::atom("ok"));
        assert_eq!(parse_term("'Not An Atom'").unwrap(), Term::atom("Not An Atom"));
    }

    #[test]
    fn parse_binary_forms() {
        assert_eq!(parse_term("<<>>").unwrap(), Term::binary(Vec::new()));
        assert_eq!(parse_term("<<1,2,3>>").unwrap(), Term::binary(vec![1, 2, 3]));
        assert_eq!(parse_term("<<\"ab\">>").unwrap(), Term::binary(b"ab".to_vec()));
    }

    #[test]
    fn parse_bitstring_with_sized_segment() {
        let t = parse_term("<<1,5:3>>").unwrap();
        match t {
            Term::Bitstring(b) => {
                assert!(!b.is_binary());
                assert_eq!(b.bytes, vec![1, 5]);
                assert_eq!(b.trailing_bits, 3);
            }
            other => panic!("expected bitstring, got {other:?}"),
        }
    }

    #[test]
    fn parse_lists_and_tails() {
        assert_eq!(parse_term("[]").unwrap(), Term::nil());
        assert_eq!(
            parse_term("[1|[2]]").unwrap(),
            Term::list(vec![Term::int(1), Term::int(2)])
        );
        let improper = parse_term("[1|2]").unwrap();
        assert!(matches!(improper, Term::Improper(..)));
        assert!(improper.proper_list().is_none());
        assert_eq!(parse_term("\"hi\"").unwrap(), Term::string("hi"));
    }

    #[test]
    fn parse_tuples_maps_handles() {
        assert_eq!(
            parse_term("{scope,{0,4}}").unwrap(),
            Term::tuple(vec![
                Term::atom("scope"),
                Term::tuple(vec![Term::int(0), Term::int(4)])
            ])
        );
        let m = parse_term("#{a => 1, a => 2}").unwrap();
        assert_eq!(m.map_get(&Term::atom("a")), Some(&Term::int(2)));
        assert_eq!(parse_term("<0.7.0>").unwrap(), Term::Pid(Pid::local(7)));
        assert!(parse_term("#Ref<0.1.2.3>").unwrap().is_reference());
    }

    #[test]
    fn parse_funs() {
        assert_eq!(parse_term("fun erlang:abs/1").unwrap().fun_arity(), Some(1));
        assert_eq!(parse_term("fun f/3").unwrap().fun_arity(), Some(3));
    }

    #[test]
    fn parse_argument_list() {
        let args = parse_terms("[<<1,2>>, 20, 2]").unwrap();
        assert_eq!(args.len(), 3);
        assert!(parse_terms("{a}").is_err());
    }

    #[test]
    fn parse_errors() {
        assert!(parse_term("[1,").is_err());
        assert!(parse_term("1 2").is_err());
        assert!(parse_term("fun /2").is_err());
        let err = parse_term("{a b}").unwrap_err();
        assert!(err.message.contains("expected"));
    }

    #[test]
    fn parse_depth_is_bounded() {
        let ok = format!("{}{}", "[".repeat(200), "]".repeat(200));
        assert!(parse_term(&ok).is_ok());
        let deep = format!("{}{}", "[".repeat(100_000), "]".repeat(100_000));
        let err = parse_term(&deep).unwrap_err();
        assert!(err.message.contains("nested deeper"), "got: {}", err.message);
        let tuples = format!("{}{}", "{".repeat(MAX_DEPTH + 1), "}".repeat(MAX_DEPTH + 1));
        assert!(parse_term(&tuples).is_err());
    }
}
