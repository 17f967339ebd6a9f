use super::*;

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input, "test.c")
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn tokenizes_a_small_function() {
    let tokens = kinds("int main() { return 42; }");
    assert_eq!(
        tokens,
        vec![
            TokenKind::Keyword(KeywordKind::Int),
            TokenKind::Identifier("main".to_string()),
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::LeftBrace,
            TokenKind::Keyword(KeywordKind::Return),
            TokenKind::Number(42),
            TokenKind::Semicolon,
            TokenKind::RightBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn longest_operator_wins() {
    assert_eq!(
        kinds("+ ++ += - -- -= -> = == != < <= > >= && ||"),
        vec![
            TokenKind::Plus,
            TokenKind::PlusPlus,
            TokenKind::PlusEqual,
            TokenKind::Minus,
            TokenKind::MinusMinus,
            TokenKind::MinusEqual,
            TokenKind::Arrow,
            TokenKind::Equal,
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::LessThan,
            TokenKind::LessThanEqual,
            TokenKind::GreaterThan,
            TokenKind::GreaterThanEqual,
            TokenKind::AmpersandAmpersand,
            TokenKind::PipePipe,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn adjacent_operators_split_greedily() {
    // "+++" scans as "++" then "+".
    assert_eq!(
        kinds("+++"),
        vec![TokenKind::PlusPlus, TokenKind::Plus, TokenKind::Eof]
    );
}

#[test]
fn comments_are_skipped() {
    let tokens = kinds("1 // line comment\n /* block\ncomment */ 2");
    assert_eq!(
        tokens,
        vec![TokenKind::Number(1), TokenKind::Number(2), TokenKind::Eof]
    );
}

#[test]
fn block_comment_ends_at_first_terminator() {
    let tokens = kinds("/* a *// b");
    assert_eq!(
        tokens,
        vec![TokenKind::Slash, TokenKind::Identifier("b".to_string()), TokenKind::Eof]
    );
}

#[test]
fn unterminated_block_comment_is_an_error() {
    let err = Lexer::new("/* never closed", "test.c").tokenize().unwrap_err();
    assert!(matches!(err, LexerError::UnterminatedComment(_)));
}

#[test]
fn string_keeps_escapes_verbatim() {
    let tokens = kinds(r#""hi\n\"there\"""#);
    assert_eq!(
        tokens,
        vec![
            TokenKind::String(r#"hi\n\"there\""#.to_string()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn unterminated_string_is_an_error() {
    let err = Lexer::new("\"open", "test.c").tokenize().unwrap_err();
    assert!(matches!(err, LexerError::UnterminatedString(_)));
}

#[test]
fn char_literals_decode_to_values() {
    assert_eq!(
        kinds(r"'a' '\n' '\0' '\\'"),
        vec![
            TokenKind::Number(97),
            TokenKind::Number(10),
            TokenKind::Number(0),
            TokenKind::Number(92),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unknown_escape_in_char_literal_is_an_error() {
    let err = Lexer::new(r"'\q'", "test.c").tokenize().unwrap_err();
    assert!(matches!(err, LexerError::UnknownEscape('q', _)));
}

#[test]
fn keywords_and_identifiers_use_maximal_munch() {
    assert_eq!(
        kinds("intx int returning return"),
        vec![
            TokenKind::Identifier("intx".to_string()),
            TokenKind::Keyword(KeywordKind::Int),
            TokenKind::Identifier("returning".to_string()),
            TokenKind::Keyword(KeywordKind::Return),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn hash_is_a_plain_token_and_directive_names_stay_identifiers() {
    assert_eq!(
        kinds("#define FOO 1"),
        vec![
            TokenKind::Hash,
            TokenKind::Identifier("define".to_string()),
            TokenKind::Identifier("FOO".to_string()),
            TokenKind::Number(1),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn line_numbers_track_newlines() {
    let tokens = Lexer::new("1\n2\n\n3", "test.c").tokenize().unwrap();
    assert_eq!(tokens[0].loc.line, 1);
    assert_eq!(tokens[1].loc.line, 2);
    assert_eq!(tokens[2].loc.line, 4);
}

#[test]
fn unexpected_character_reports_its_location() {
    let err = Lexer::new("int a;\n@", "test.c").tokenize().unwrap_err();
    match err {
        LexerError::UnexpectedChar(c, loc) => {
            assert_eq!(c, '@');
            assert_eq!(loc.line, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn tokens_display_through_their_kind() {
    let tokens = Lexer::new("x += 2;", "test.c").tokenize().unwrap();
    let text: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    assert_eq!(text, vec!["x", "+=", "2", ";", ""]);
}
