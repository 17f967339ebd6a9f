use super::{error::CodegenError, generate};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::semantic::check_program;

fn compile(source: &str) -> String {
    let tokens = Lexer::new(source, "test.c").tokenize().unwrap();
    let mut program = Parser::new(tokens).parse().unwrap();
    check_program(&mut program).unwrap();
    generate(&program).unwrap()
}

fn compile_err(source: &str) -> CodegenError {
    let tokens = Lexer::new(source, "test.c").tokenize().unwrap();
    let mut program = Parser::new(tokens).parse().unwrap();
    check_program(&mut program).unwrap();
    generate(&program).unwrap_err()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn output_starts_with_the_syntax_directive() {
    let asm = compile("int main() { return 0; }");
    assert!(asm.starts_with(".intel_syntax noprefix\n"));
    assert!(asm.contains("# compiled by kancil"));
}

#[test]
fn functions_get_a_prologue_and_a_shared_epilogue() {
    let asm = compile("int main() { int x; return 0; }");
    assert!(asm.contains(".globl main"));
    assert!(asm.contains("main:\n  push rbp\n  mov rbp, rsp\n"));
    // 8 bytes of locals round up to a 16-byte frame.
    assert!(asm.contains("sub rsp, 16"));
    assert!(asm.contains("jmp .L.RETURN.main"));
    assert!(asm.contains(".L.RETURN.main:\n  mov rsp, rbp\n  pop rbp\n  ret\n"));
}

#[test]
fn parameters_spill_with_their_own_width() {
    let asm = compile("int f(char c, int i, int *p) { return i; }");
    assert!(asm.contains("mov [rbp-1], dil"));
    assert!(asm.contains("mov [rbp-8], esi"));
    assert!(asm.contains("mov [rbp-16], rdx"));
}

#[test]
fn char_loads_sign_extend() {
    let asm = compile("int f(char c) { return c; }");
    assert!(asm.contains("movsx rax, byte ptr [rax]"));
}

#[test]
fn int_loads_sign_extend() {
    let asm = compile("int f(int i) { return i; }");
    assert!(asm.contains("movsxd rax, dword ptr [rax]"));
}

#[test]
fn char_stores_use_the_byte_register() {
    let asm = compile("int f(char c) { c = 7; return c; }");
    assert!(asm.contains("mov [rdi], al"));
}

#[test]
fn pointer_addition_scales_by_the_element_size() {
    let asm = compile("int f(int *p) { return *(p + 2); }");
    assert!(asm.contains("imul rdi, 4"));
}

#[test]
fn pointer_difference_divides_by_the_element_size() {
    let asm = compile("int f(int *a, int *b) { return a - b; }");
    assert!(asm.contains("sub rax, rdi"));
    assert!(asm.contains("mov rdi, 4"));
    assert!(asm.contains("idiv rdi"));
}

#[test]
fn indexing_an_array_goes_through_its_address() {
    let asm = compile("int f() { int a[3]; return a[1]; }");
    // The array slot sits at the top of the 12-byte allocation.
    assert!(asm.contains("lea rax, [rbp-12]"));
    assert!(asm.contains("imul rdi, 4"));
}

#[test]
fn comparisons_normalize_to_zero_or_one() {
    let asm = compile("int f(int a, int b) { return a < b; }");
    assert!(asm.contains("cmp rax, rdi"));
    assert!(asm.contains("setl al"));
    assert!(asm.contains("movzb rax, al"));
}

#[test]
fn division_sign_extends_into_rdx() {
    let asm = compile("int f(int a, int b) { return a / b; }");
    assert!(asm.contains("cqo"));
    assert!(asm.contains("idiv rdi"));
}

#[test]
fn modulo_takes_the_remainder_from_rdx() {
    let asm = compile("int f(int a, int b) { return a % b; }");
    assert!(asm.contains("mov rax, rdx"));
}

#[test]
fn globals_are_emitted_into_the_data_section() {
    let asm = compile("int counter = 5;\nchar flag;\nint main() { return counter; }");
    assert!(asm.contains(".data"));
    assert!(asm.contains("counter:\n  .long 5"));
    assert!(asm.contains("flag:\n  .zero 1"));
    assert!(asm.contains("lea rax, counter[rip]"));
}

#[test]
fn partial_global_lists_zero_the_tail() {
    let asm = compile("int table[4] = {1, 2};\nint main() { return 0; }");
    assert!(asm.contains("table:\n  .long 1\n  .long 2\n  .zero 8"));
}

#[test]
fn string_literals_live_in_labeled_slots() {
    let asm = compile("int main() { return *\"abc\"; }");
    assert!(asm.contains(".L.STR0:\n  .string \"abc\""));
    assert!(asm.contains("lea rax, .L.STR0[rip]"));
}

#[test]
fn calls_align_the_stack_both_ways() {
    let asm = compile("int main() { return twice(21); }");
    assert!(asm.contains("and rax, 15"));
    assert!(asm.contains("sub rsp, 8"));
    assert!(asm.contains("add rsp, 8"));
    assert_eq!(count(&asm, "call twice"), 2);
}

#[test]
fn call_arguments_fill_the_registers_in_order() {
    let asm = compile("int main() { return f(1, 2, 3); }");
    assert!(asm.contains("pop rdx\n  pop rsi\n  pop rdi\n"));
}

#[test]
fn seven_call_arguments_is_an_error() {
    let err = compile_err("int main() { return f(1, 2, 3, 4, 5, 6, 7); }");
    assert!(matches!(err, CodegenError::TooManyArguments(name, _) if name == "f"));
}

#[test]
fn switch_compiles_to_a_compare_chain() {
    let asm = compile(
        "int f(int x) { switch (x) { case 1: return 10; case 2: return 20; default: return 0; } }",
    );
    assert!(asm.contains("cmp rax, 1"));
    assert!(asm.contains("je .L1.CASE0"));
    assert!(asm.contains("cmp rax, 2"));
    assert!(asm.contains("je .L1.CASE1"));
    // The default block is the jump-through target.
    assert!(asm.contains("jmp .L1.CASE2"));
}

#[test]
fn switch_without_default_falls_out_the_end() {
    let asm = compile("int f(int x) { switch (x) { case 1: return 1; } return 0; }");
    assert!(asm.contains("jmp .L1.END"));
}

#[test]
fn switch_control_must_be_an_lvalue() {
    let err = compile_err("int f(int x) { switch (x + 1) { case 1: return 1; } return 0; }");
    assert!(matches!(err, CodegenError::NotAnLvalue(_)));
}

#[test]
fn enum_constants_compile_to_immediates() {
    let asm = compile("enum { RED, GREEN, BLUE };\nint main() { return BLUE; }");
    assert!(asm.contains("mov rax, 2"));
}

#[test]
fn logical_and_short_circuits() {
    let asm = compile("int f(int a) { return a && g(); }");
    assert!(asm.contains("je .L1.FALSE"));
    assert_eq!(count(&asm, "call g"), 2);
    assert!(asm.contains(".L1.FALSE:\n  mov rax, 0"));
}

#[test]
fn logical_or_short_circuits() {
    let asm = compile("int f(int a, int b) { return a || b; }");
    assert!(asm.contains("jne .L1.TRUE"));
    assert!(asm.contains(".L1.TRUE:\n  mov rax, 1"));
}

#[test]
fn while_loops_test_before_the_body() {
    let asm = compile("int f(int n) { while (n) { n = n - 1; } return n; }");
    assert!(asm.contains(".L1.WHILE:"));
    assert!(asm.contains("je .L1.END"));
    assert!(asm.contains("jmp .L1.WHILE"));
}

#[test]
fn do_while_loops_test_after_the_body() {
    let asm = compile("int f(int n) { do { n = n - 1; } while (n); return n; }");
    assert!(asm.contains(".L1.DO:"));
    assert!(asm.contains(".L1.CONTINUE:"));
    assert!(asm.contains("jne .L1.DO"));
}

#[test]
fn for_continue_jumps_to_the_step() {
    let asm = compile(
        "int f() { int s; s = 0; for (int i = 0; i < 9; i = i + 1) { continue; } return s; }",
    );
    assert!(asm.contains("jmp .L1.CONTINUE"));
    assert!(asm.contains(".L1.CONTINUE:"));
    assert!(asm.contains("jmp .L1.FOR"));
}

#[test]
fn break_outside_a_loop_is_an_error() {
    let err = compile_err("int main() { break; return 0; }");
    assert!(matches!(err, CodegenError::StrayBreak));
}

#[test]
fn member_access_adds_the_offset() {
    let asm = compile("struct p { int x; int y; };\nint f(struct p v) { return v.y; }");
    assert!(asm.contains("add rax, 4"));
}

#[test]
fn local_initializer_lists_fill_and_zero() {
    let asm = compile("int main() { int a[3] = {7}; return a[0]; }");
    assert!(asm.contains("lea rax, [rbp-12]"));
    assert_eq!(count(&asm, "mov dword ptr [rbp-"), 2);
}

#[test]
fn post_increment_pushes_the_old_value() {
    let asm = compile("int f(int x) { return x++; }");
    assert!(asm.contains("mov rdx, rax"));
    assert!(asm.contains("add rax, 1"));
    assert!(asm.contains("push rdx"));
}

#[test]
fn sizeof_compiles_to_an_immediate() {
    let asm = compile("int main() { int a[5]; return sizeof(a); }");
    assert!(asm.contains("mov rax, 20"));
}

#[test]
fn whole_struct_assignment_is_rejected() {
    let err = compile_err(
        "struct s { int a; int b; };\nint f() { struct s x; struct s y; x = y; return 0; }",
    );
    assert!(matches!(err, CodegenError::AggregateAssignment(_)));
}

#[test]
fn the_misaligned_call_branch_adjusts_rsp() {
    let asm = compile("int main() { return f(); }");
    assert!(asm.contains("jnz .L.FNCALL1.MISALIGNED"));
    assert!(asm.contains(".L.FNCALL1.MISALIGNED:\n  sub rsp, 8"));
}
