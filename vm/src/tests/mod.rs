use {
    crate::{BufferHost, Vm, VmRunError, VmRunOk},
    alloc::{string::String, vec, vec::Vec},
    esolang::{asm::assemble, Label},
    hashbrown::HashMap,
    VmRunError::*,
};

struct Outcome {
    result: Result<VmRunOk, VmRunError>,
    output: String,
    stack: Vec<i64>,
    heap: HashMap<i64, i64>,
}

fn exec(listing: &str, input: &str) -> Outcome {
    let source = assemble(listing).unwrap();
    let mut vm = Vm::<_, 0>::new(&source, BufferHost::new(input)).unwrap();
    let result = vm.run();
    Outcome {
        result,
        output: vm.host.output().into(),
        stack: vm.stack.clone(),
        heap: vm.heap.clone(),
    }
}

#[test]
fn empty_program() {
    for source in ["", "no_instructions_here"] {
        let mut vm = Vm::<_, 0>::new(source, BufferHost::default()).unwrap();
        assert_eq!(vm.run(), Ok(VmRunOk::End));
    }
}

#[test]
fn spaces_in_comments_are_instructions() {
    let err = Vm::<_, 0>::new("no instructions here", BufferHost::default()).err();
    assert_eq!(err, Some(MalformedInstruction { offset: 20 }));
}

#[test]
fn print_pops_in_stack_order() {
    let hi = exec("push 105\npush 72\noutchar\noutchar\nexit", "");
    assert_eq!(hi.result, Ok(VmRunOk::Exit));
    assert_eq!(hi.output, "Hi");
    assert!(hi.stack.is_empty());
    assert!(hi.heap.is_empty());

    let reversed = exec("push 72\npush 105\noutchar\noutchar", "");
    assert_eq!(reversed.result, Ok(VmRunOk::End));
    assert_eq!(reversed.output, "iH");
}

#[test]
fn counter_loop() {
    let listing = "
        push 5
        label 0
        dup
        outnum
        push 1
        sub
        dup
        jz 1
        jmp 0
        label 1
        exit
    ";
    let run = exec(listing, "");
    assert_eq!(run.result, Ok(VmRunOk::Exit));
    assert_eq!(run.output, "54321");
    assert_eq!(run.stack, vec![0]);
}

#[test]
fn heap_store_and_retrieve() {
    let run = exec("push 5\npush 42\nstore\npush 5\nretr", "");
    assert_eq!(run.result, Ok(VmRunOk::End));
    assert_eq!(run.stack, vec![42]);
    assert_eq!(run.heap.get(&5), Some(&42));

    let run = exec("push 5\npush 42\nstore\npush 6\nretr", "");
    assert_eq!(run.result, Err(UndefinedHeapAddress(6)));
}

#[test]
fn pop_on_empty_stack() {
    let run = exec("pop\npush 65\noutchar", "");
    assert_eq!(run.result, Err(StackUnderflow));
    assert_eq!(run.output, "");
}

#[test]
fn arithmetic_operand_order() {
    let run = exec("push 7\npush 2\nsub\npush 7\npush 2\ndiv\npush -7\npush 2\nmod", "");
    assert_eq!(run.stack, vec![5, 3, -1]);
}

#[test]
fn arithmetic_wraps() {
    let run = exec(&std::format!("push {}\npush 1\nadd\npush -1\ndiv", i64::MAX), "");
    assert_eq!(run.result, Ok(VmRunOk::End));
    assert_eq!(run.stack, vec![i64::MIN]);
}

#[test]
fn division_by_zero() {
    assert_eq!(exec("push 1\npush 0\ndiv", "").result, Err(DivideByZero));
    assert_eq!(exec("push 1\npush 0\nmod", "").result, Err(DivideByZero));
}

#[test]
fn stack_manipulation() {
    let run = exec("push 1\npush 2\npush 3\ncopy 2\nswap\nslide 1", "");
    assert_eq!(run.stack, vec![1, 2, 3]);

    let run = exec("push 1\npush 2\npush 3\nslide -1", "");
    assert_eq!(run.stack, vec![1, 2, 3]);

    assert_eq!(exec("push 1\ncopy 1", "").result, Err(StackUnderflow));
    assert_eq!(exec("push 1\ncopy -1", "").result, Err(StackUnderflow));
    assert_eq!(exec("push 1\npush 2\nslide 2", "").result, Err(StackUnderflow));
    assert_eq!(exec("push 1\nswap", "").result, Err(StackUnderflow));
    assert_eq!(exec("dup", "").result, Err(StackUnderflow));
}

#[test]
fn call_and_return() {
    let listing = "
        call 1
        push 33
        outchar
        exit
        label 1
        push 72
        outchar
        ret
    ";
    let run = exec(listing, "");
    assert_eq!(run.result, Ok(VmRunOk::Exit));
    assert_eq!(run.output, "H!");

    assert_eq!(exec("ret", "").result, Err(CallStackUnderflow));
}

#[test]
fn forward_jump_skips_code() {
    let run = exec("jmp 01\npush 1\noutnum\nlabel 01\npush 2\noutnum", "");
    assert_eq!(run.output, "2");
}

#[test]
fn last_label_definition_wins() {
    let run = exec("jmp 1\nlabel 1\npush 1\nexit\nlabel 1\npush 2", "");
    assert_eq!(run.result, Ok(VmRunOk::End));
    assert_eq!(run.stack, vec![2]);
}

#[test]
fn conditional_jumps() {
    let run = exec("push -3\njn 1\npush 1\nlabel 1\npush 0\njz 0\npush 2\nlabel 0", "");
    assert!(run.stack.is_empty());

    let run = exec("push 3\njn 1\npush 1\nlabel 1", "");
    assert_eq!(run.stack, vec![1]);
}

#[test]
fn undefined_label() {
    assert_eq!(exec("jmp 10", "").result, Err(UndefinedLabel(Label::new(*b"\t "))));
}

#[test]
fn number_output() {
    assert_eq!(exec("push -4\noutnum\npush 0\noutnum", "").output, "-40");
}

#[test]
fn reading_input() {
    let listing = "
        push 0
        readchar
        push 1
        readnum
        push 0
        retr
        outchar
        push 1
        retr
        outnum
    ";
    let run = exec(listing, "A 17 \n");
    assert_eq!(run.result, Ok(VmRunOk::End));
    assert_eq!(run.output, "A17");

    assert_eq!(exec("push 0\nreadnum", "seventeen\n").result, Err(InvalidNumericInput));
    assert_eq!(exec("push 0\nreadchar", "").result, Err(EndOfInput));
    assert_eq!(exec("push 0\nreadnum", "").result, Err(EndOfInput));
}

#[test]
fn invalid_character() {
    assert_eq!(exec("push -1\noutchar", "").result, Err(InvalidCharacter(-1)));
    assert_eq!(exec("push 55296\noutchar", "").result, Err(InvalidCharacter(0xD800)));
}

#[test]
fn incomplete_source_fails_before_execution() {
    // push 65, outchar, then a push without its terminator
    let source = "   \t     \t\n\t\n     \t";
    let err = Vm::<_, 0>::new(source, BufferHost::default()).err();
    assert_eq!(err, Some(MalformedInstruction { offset: source.len() }));

    let mut host = BufferHost::default();
    assert!(crate::run(source, &mut host).is_err());
    assert_eq!(host.output(), "");
}

#[test]
fn unknown_command_fails_before_execution() {
    let err = Vm::<_, 0>::new(" \t\t", BufferHost::default()).err();
    assert_eq!(err, Some(MalformedInstruction { offset: 2 }));
}

#[test]
fn timer_interrupts() {
    let source = assemble("push 1\npush 2\npush 3").unwrap();
    let mut vm = Vm::<_, 2>::new(&source, BufferHost::default()).unwrap();
    assert_eq!(vm.run(), Ok(VmRunOk::Timer));
    assert_eq!(vm.stack, vec![1, 2]);
    assert_eq!(vm.run(), Ok(VmRunOk::End));
    assert_eq!(vm.stack, vec![1, 2, 3]);
}

#[test]
fn exit_is_final() {
    let source = assemble("exit\npush 1").unwrap();
    let mut vm = Vm::<_, 0>::new(&source, BufferHost::default()).unwrap();
    assert_eq!(vm.run(), Ok(VmRunOk::Exit));
    assert_eq!(vm.run(), Ok(VmRunOk::End));
    assert!(vm.stack.is_empty());
}

#[test]
fn comments_are_ignored() {
    let run = crate::run("say   \t     \t\nhi\t\n  !", BufferHost::default());
    assert_eq!(run, Ok(()));

    let mut host = BufferHost::default();
    crate::run("say   \t     \t\nhi\t\n  !", &mut host).unwrap();
    assert_eq!(host.output(), "A");
}

#[test]
fn error_messages() {
    use std::string::ToString;
    assert_eq!(MalformedInstruction { offset: 3 }.to_string(), "malformed instruction at 3");
    assert_eq!(UndefinedLabel(Label::new(*b" \t")).to_string(), "undefined label 01");
    assert_eq!(UndefinedHeapAddress(-2).to_string(), "undefined heap address -2");
}
