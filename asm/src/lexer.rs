use arch::isa::Opcode;
use color_print::cprintln;
use strum::EnumString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Section marker: a lexeme with a leading `.`.
    Section,
    /// Recognized instruction mnemonic.
    Instruction,
    /// `DB`, `DS` or `ORG`.
    Directive,
    /// Parses as a base-16 number. Width is checked later by the passes.
    Number,
    /// Identifier: label definition or label reference.
    Variable,
    /// Anything else. Logged, kept in the stream.
    Unknown,
    /// End-of-stream marker, always the last token.
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: &str) -> Self {
        Token {
            kind,
            text: text.to_string(),
        }
    }
}

/// Assembler directives. `DS` is recognized but carries no semantics in
/// either pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum Directive {
    DB,
    DS,
    ORG,
}

fn is_number(s: &str) -> bool {
    i64::from_str_radix(s, 16).is_ok()
}

fn is_variable(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Classification order matters: `ADD` is an instruction and `DB` a
/// directive even though both also parse as hex.
fn classify(lexeme: &str) -> Token {
    if let Some(name) = lexeme.strip_prefix('.') {
        return Token::new(TokenKind::Section, name);
    }
    if Opcode::parse(lexeme).is_ok() {
        return Token::new(TokenKind::Instruction, lexeme);
    }
    if lexeme.parse::<Directive>().is_ok() {
        return Token::new(TokenKind::Directive, lexeme);
    }
    if is_number(lexeme) {
        return Token::new(TokenKind::Number, lexeme);
    }
    if is_variable(lexeme) {
        return Token::new(TokenKind::Variable, lexeme);
    }
    cprintln!("<yellow,bold>warn</>: unknown token: `{}`", lexeme);
    Token::new(TokenKind::Unknown, lexeme)
}

/// Split source text into the token stream consumed by both assembler
/// passes. `;` starts a comment running to end of line.
pub fn tokenize(src: &str) -> Vec<Token> {
    let mut tokens = vec![];
    for line in src.lines() {
        let code = line.split(';').next().unwrap_or("");
        for lexeme in code.split_whitespace() {
            tokens.push(classify(lexeme));
        }
    }
    tokens.push(Token::new(TokenKind::Eof, ""));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_classify_line() {
        use TokenKind::*;
        assert_eq!(
            kinds(".CODE\nORG 00\nLDA X\nHLT\n"),
            vec![Section, Directive, Number, Instruction, Variable, Instruction, Eof]
        );
    }

    #[test]
    fn test_section_strips_dot() {
        let tokens = tokenize(".DATA");
        assert_eq!(tokens[0], Token::new(TokenKind::Section, "DATA"));
    }

    #[test]
    fn test_comment_stripped() {
        use TokenKind::*;
        assert_eq!(kinds("LDA X ; load X\n; full comment line\n"), vec![Instruction, Variable, Eof]);
    }

    #[test]
    fn test_lowercase_mnemonic_is_variable() {
        assert_eq!(tokenize("lda")[0].kind, TokenKind::Variable);
    }

    #[test]
    fn test_hex_identifier_is_number() {
        // `FACE` parses as base-16, so it classifies as a number.
        assert_eq!(tokenize("FACE")[0].kind, TokenKind::Number);
        assert_eq!(tokenize("X1")[0].kind, TokenKind::Variable);
    }

    #[test]
    fn test_unknown_still_emitted() {
        let tokens = tokenize("@#!");
        assert_eq!(tokens[0].kind, TokenKind::Unknown);
        assert_eq!(tokens[0].text, "@#!");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_eof_terminates_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }
}
