use super::check_program;
use super::error::TypeError;
use crate::lexer::Lexer;
use crate::parser::ast::{ExprKind, Program, Stmt};
use crate::parser::Parser;
use crate::types::Type;

fn checked(source: &str) -> Program {
    let tokens = Lexer::new(source, "test.c").tokenize().unwrap();
    let mut program = Parser::new(tokens).parse().unwrap();
    check_program(&mut program).unwrap();
    program
}

fn check_err(source: &str) -> TypeError {
    let tokens = Lexer::new(source, "test.c").tokenize().unwrap();
    let mut program = Parser::new(tokens).parse().unwrap();
    check_program(&mut program).unwrap_err()
}

fn return_type(program: &Program) -> &Type {
    let Stmt::Return(Some(expr)) = &program.functions[0].body[0] else {
        panic!("expected a return statement first");
    };
    expr.ty.as_ref().unwrap()
}

#[test]
fn numbers_are_int() {
    let program = checked("int main() { return 42; }");
    assert_eq!(return_type(&program), &Type::Int);
}

#[test]
fn char_promotes_to_int_in_arithmetic() {
    let program = checked("int main(char c) { return -c; }");
    assert_eq!(return_type(&program), &Type::Int);
}

#[test]
fn pointer_plus_int_keeps_the_pointer_type() {
    let program = checked("int *f(int *p) { return p + 2; }");
    assert_eq!(return_type(&program), &Type::Pointer(Box::new(Type::Int)));
}

#[test]
fn array_plus_int_decays_to_a_pointer() {
    let program = checked("int *f() { int a[4]; return a + 1; }");
    let Stmt::Return(Some(expr)) = &program.functions[0].body[1] else {
        panic!("expected a return statement");
    };
    assert_eq!(
        expr.ty.as_ref().unwrap(),
        &Type::Pointer(Box::new(Type::Int))
    );
}

#[test]
fn pointer_difference_is_int() {
    let program = checked("int f(int *a, int *b) { return a - b; }");
    assert_eq!(return_type(&program), &Type::Int);
}

#[test]
fn deref_yields_the_base_type() {
    let program = checked("char f(char *p) { return *p; }");
    assert_eq!(return_type(&program), &Type::Char);
}

#[test]
fn address_of_wraps_in_a_pointer() {
    let program = checked("int main() { int x; int *p; p = &x; return 0; }");
    let Stmt::Expr(expr) = &program.functions[0].body[2] else {
        panic!("expected an expression statement");
    };
    let ExprKind::Assign(_, _, rhs) = &expr.kind else {
        panic!("expected an assignment");
    };
    assert_eq!(
        rhs.ty.as_ref().unwrap(),
        &Type::Pointer(Box::new(Type::Int))
    );
}

#[test]
fn member_access_finds_the_member_type() {
    let program = checked(
        "struct point { char tag; int x; };\nint f(struct point p) { return p.x; }",
    );
    assert_eq!(return_type(&program), &Type::Int);
}

#[test]
fn arrow_access_goes_through_the_pointer() {
    let program = checked(
        "struct point { int x; int y; };\nint f(struct point *p) { return p->y; }",
    );
    assert_eq!(return_type(&program), &Type::Int);
}

#[test]
fn anonymous_members_are_reachable_from_the_outer_type() {
    let program = checked(
        "struct outer { int a; struct { int b; }; };\nint f(struct outer o) { return o.b; }",
    );
    assert_eq!(return_type(&program), &Type::Int);
}

#[test]
fn unknown_functions_default_to_returning_int() {
    let program = checked("int main() { return mystery(1, 2); }");
    assert_eq!(return_type(&program), &Type::Int);
}

#[test]
fn declared_functions_use_their_return_type() {
    let program = checked("char *name(void);\nchar *f() { return name(); }");
    assert_eq!(return_type(&program), &Type::Pointer(Box::new(Type::Char)));
}

#[test]
fn enum_constants_type_as_int() {
    let program = checked("enum color { RED, GREEN };\nint main() { return GREEN; }");
    assert_eq!(return_type(&program), &Type::Int);
}

#[test]
fn sizeof_is_int() {
    let program = checked("int main(int *p) { return sizeof(*p); }");
    assert_eq!(return_type(&program), &Type::Int);
}

#[test]
fn string_literals_are_char_arrays_with_a_terminator() {
    let program = checked("char *f() { return \"abc\"; }");
    let Stmt::Return(Some(expr)) = &program.functions[0].body[0] else {
        panic!("expected a return statement");
    };
    assert_eq!(
        expr.ty.as_ref().unwrap(),
        &Type::Array(Box::new(Type::Char), 4)
    );
}

#[test]
fn compatible_pointers_may_be_compared() {
    let program = checked("int f(int *a, int *b) { return a < b; }");
    assert_eq!(return_type(&program), &Type::Int);
}

#[test]
fn undefined_variable_is_an_error() {
    let err = check_err("int main() { return ghost; }");
    assert!(matches!(err, TypeError::UndefinedVariable(name, _) if name == "ghost"));
}

#[test]
fn dereferencing_an_int_is_an_error() {
    let err = check_err("int main(int x) { return *x; }");
    assert!(matches!(err, TypeError::ExpectedPointer(_)));
}

#[test]
fn assigning_a_pointer_to_an_int_is_an_error() {
    let err = check_err("int main(int *p) { int x; x = p; return x; }");
    assert!(matches!(err, TypeError::IncompatibleAssignment(_)));
}

#[test]
fn missing_member_is_an_error() {
    let err = check_err("struct s { int a; };\nint f(struct s v) { return v.b; }");
    assert!(matches!(err, TypeError::InvalidMemberAccess(name, _) if name == "b"));
}

#[test]
fn too_many_initializers_is_an_error() {
    let err = check_err("int main() { int a[2] = {1, 2, 3}; return 0; }");
    assert!(matches!(err, TypeError::TooManyInitializers(_)));
}

#[test]
fn initializer_list_on_a_scalar_is_an_error() {
    let err = check_err("int main() { int x = {1}; return x; }");
    assert!(matches!(err, TypeError::ExpectedArray(name) if name == "x"));
}

#[test]
fn multiplying_pointers_is_an_error() {
    let err = check_err("int f(int *a, int *b) { return a * b; }");
    assert!(matches!(err, TypeError::ExpectedInteger(_)));
}

#[test]
fn checking_twice_is_harmless() {
    let source = "int main() { return 1 + 2; }";
    let tokens = Lexer::new(source, "test.c").tokenize().unwrap();
    let mut program = Parser::new(tokens).parse().unwrap();
    check_program(&mut program).unwrap();
    check_program(&mut program).unwrap();
    assert_eq!(return_type(&program), &Type::Int);
}

#[test]
fn assignment_takes_the_assigned_values_type() {
    let program = checked("int f(int x, char c) { return x = c; }");
    assert_eq!(return_type(&program), &Type::Char);
}

#[test]
fn compound_pointer_step_keeps_the_pointer_type() {
    let program = checked("int *f(int *p) { return p += 2; }");
    assert_eq!(return_type(&program), &Type::Pointer(Box::new(Type::Int)));
}
