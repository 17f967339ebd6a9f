use super::*;
use crate::common::KeywordKind;

fn kinds(pp: &mut Preprocessor, input: &str) -> Vec<TokenKind> {
    pp.preprocess(input, "test.c")
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn define_replaces_later_identifiers() {
    let mut pp = Preprocessor::new();
    assert_eq!(
        kinds(&mut pp, "#define N 8\nint a = N;"),
        vec![
            TokenKind::Keyword(KeywordKind::Int),
            TokenKind::Identifier("a".to_string()),
            TokenKind::Equal,
            TokenKind::Number(8),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn macro_can_map_identifier_to_identifier() {
    let mut pp = Preprocessor::new();
    assert_eq!(
        kinds(&mut pp, "#define a b\na;"),
        vec![
            TokenKind::Identifier("b".to_string()),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn substitution_keeps_the_original_location() {
    let mut pp = Preprocessor::new();
    let tokens = pp.preprocess("#define N 8\n\nN;", "test.c").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Number(8));
    assert_eq!(tokens[0].loc.line, 3);
}

#[test]
fn define_without_replacement_is_an_error() {
    let mut pp = Preprocessor::new();
    let err = pp.preprocess("#define N", "test.c").unwrap_err();
    assert!(matches!(err, PreprocessorError::MalformedDefine(_)));
}

#[test]
fn ifdef_stdc_deletes_through_endif() {
    let mut pp = Preprocessor::new();
    assert_eq!(
        kinds(&mut pp, "1\n#ifdef __STDC__\n2 3\n#endif\n4"),
        vec![TokenKind::Number(1), TokenKind::Number(4), TokenKind::Eof]
    );
}

#[test]
fn ifndef_stdc_keeps_the_body() {
    let mut pp = Preprocessor::new();
    assert_eq!(
        kinds(&mut pp, "#ifndef __STDC__\n1\n#endif\n2"),
        vec![TokenKind::Number(1), TokenKind::Number(2), TokenKind::Eof]
    );
}

#[test]
fn stray_endif_is_dropped() {
    let mut pp = Preprocessor::new();
    assert_eq!(
        kinds(&mut pp, "#endif\n7"),
        vec![TokenKind::Number(7), TokenKind::Eof]
    );
}

#[test]
fn other_condition_names_are_rejected() {
    let mut pp = Preprocessor::new();
    let err = pp.preprocess("#ifdef FOO\n#endif", "test.c").unwrap_err();
    match err {
        PreprocessorError::UnsupportedCondition(name, _) => assert_eq!(name, "FOO"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unknown_directive_is_rejected() {
    let mut pp = Preprocessor::new();
    let err = pp.preprocess("#pragma once", "test.c").unwrap_err();
    assert!(matches!(err, PreprocessorError::UnknownDirective(name, _) if name == "pragma"));
}

#[test]
fn missing_endif_is_an_error() {
    let mut pp = Preprocessor::new();
    let err = pp
        .preprocess("#ifdef __STDC__\nint a;", "test.c")
        .unwrap_err();
    assert!(matches!(err, PreprocessorError::MissingEndif(_)));
}

#[test]
fn include_splices_tokens_and_propagates_defines() {
    let dir = std::env::temp_dir();
    let path = dir.join("kancil_pp_include_test.h");
    std::fs::write(&path, "#define WIDTH 3\nint shared;\n").unwrap();

    let source = format!("#include \"{}\"\nint a = WIDTH;", path.display());
    let mut pp = Preprocessor::new();
    let tokens = kinds(&mut pp, &source);
    std::fs::remove_file(&path).ok();

    assert_eq!(
        tokens,
        vec![
            TokenKind::Keyword(KeywordKind::Int),
            TokenKind::Identifier("shared".to_string()),
            TokenKind::Semicolon,
            TokenKind::Keyword(KeywordKind::Int),
            TokenKind::Identifier("a".to_string()),
            TokenKind::Equal,
            TokenKind::Number(3),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn missing_include_file_is_an_error() {
    let mut pp = Preprocessor::new();
    let err = pp
        .preprocess("#include \"/no/such/kancil/file.h\"", "test.c")
        .unwrap_err();
    assert!(matches!(err, PreprocessorError::Include(..)));
}

#[test]
fn cli_defines_feed_the_same_table() {
    let mut pp = Preprocessor::new();
    pp.define("N=5").unwrap();
    pp.define("FLAG").unwrap();
    assert_eq!(
        kinds(&mut pp, "N FLAG"),
        vec![TokenKind::Number(5), TokenKind::Number(1), TokenKind::Eof]
    );
}

#[test]
fn malformed_cli_define_is_rejected() {
    let mut pp = Preprocessor::new();
    assert!(matches!(
        pp.define("A=1 2"),
        Err(PreprocessorError::MalformedCliDefine(_))
    ));
    assert!(matches!(
        pp.define("not a name"),
        Err(PreprocessorError::MalformedCliDefine(_))
    ));
}
