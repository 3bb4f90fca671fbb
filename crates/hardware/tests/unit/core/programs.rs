//! End-to-End Program Tests.
//!
//! Runs small RV32I programs to halt and checks the architectural result,
//! the committed instruction stream and basic timing sanity.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::halt;
use crate::common::builder::InstructionBuilder as I;
use crate::common::harness::TestContext;
use tomasim_core::config::Config;

/// `a0 = n` by counting down `t0` from `n`; the loop body starts at 8.
fn count_loop(n: i32) -> Vec<u32> {
    vec![
        I::new().addi(10, 0, 0).build(),
        I::new().addi(5, 0, n).build(),
        I::new().addi(10, 10, 1).build(),
        I::new().addi(5, 5, -1).build(),
        I::new().bne(5, 0, -8).build(),
        halt(),
    ]
}

// ══════════════════════════════════════════════════════════
// 1. Halt and result contract
// ══════════════════════════════════════════════════════════

#[test]
fn halt_only_program_returns_zero() {
    let mut ctx = TestContext::new().load_program(&[halt()]);
    assert_eq!(ctx.run().expect("halts"), 0);
    assert_eq!(ctx.committed_pcs(), vec![0]);
    assert_eq!(ctx.sim.stats().instructions_committed, 1);
}

#[test]
fn halt_does_not_write_a0() {
    let program = [I::new().addi(10, 0, 3).build(), halt()];
    let mut ctx = TestContext::new().load_program(&program);
    assert_eq!(ctx.run().expect("halts"), 3);
    assert_eq!(ctx.a0(), 3);
}

#[test]
fn result_is_low_byte_of_a0() {
    let program = [
        I::new().lui(10, 0x12345).build(),
        I::new().addi(10, 10, 0x6AB).build(),
        halt(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    assert_eq!(ctx.run().expect("halts"), 0xAB);
    assert_eq!(ctx.a0(), 0x1234_56AB);
}

// ══════════════════════════════════════════════════════════
// 2. Loops
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::single(1)]
#[case::short(5)]
#[case::long(40)]
fn counting_loop_returns_iteration_count(#[case] n: i32) {
    let mut ctx = TestContext::new().load_program(&count_loop(n));
    assert_eq!(ctx.run().expect("halts"), n as u8);
    assert_eq!(ctx.get_reg(5), 0);

    let stats = ctx.sim.stats();
    assert!(stats.cycles > n as u64, "cycles {}", stats.cycles);
    assert_eq!(stats.instructions_committed, 2 + 3 * n as u64 + 1);
}

#[test]
fn commit_trace_follows_program_order() {
    let n = 4;
    let mut ctx = TestContext::new().load_program(&count_loop(n));
    let _ = ctx.run().expect("halts");

    let mut expected = vec![0, 4];
    for _ in 0..n {
        expected.extend([8, 12, 16]);
    }
    expected.push(20);
    assert_eq!(ctx.committed_pcs(), expected);

    let cycles: Vec<u64> = ctx
        .sim
        .commit_trace()
        .unwrap_or_default()
        .iter()
        .map(|&(_, c)| c)
        .collect();
    assert!(cycles.windows(2).all(|w| w[0] < w[1]), "one commit per cycle");
}

// ══════════════════════════════════════════════════════════
// 3. Integer operations
// ══════════════════════════════════════════════════════════

#[test]
fn dependent_alu_chain() {
    let program = [
        I::new().addi(1, 0, 12).build(),
        I::new().addi(2, 0, -5).build(),
        I::new().add(3, 1, 2).build(),  // 7
        I::new().sub(4, 1, 2).build(),  // 17
        I::new().slli(5, 3, 4).build(), // 112
        I::new().sra(6, 2, 3).build(),  // -5 >> 7 = -1
        I::new().slt(7, 2, 1).build(),  // 1
        I::new().sltu(8, 2, 1).build(), // 0
        I::new().xor(9, 4, 5).build(),  // 17 ^ 112 = 97
        I::new().or(10, 9, 7).build(),  // 97
        I::new().and(11, 5, 4).build(), // 112 & 17 = 16
        halt(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    assert_eq!(ctx.run().expect("halts"), 97);

    assert_eq!(ctx.get_reg(3), 7);
    assert_eq!(ctx.get_reg(4), 17);
    assert_eq!(ctx.get_reg(5), 112);
    assert_eq!(ctx.get_reg(6), u32::MAX);
    assert_eq!(ctx.get_reg(7), 1);
    assert_eq!(ctx.get_reg(8), 0);
    assert_eq!(ctx.get_reg(11), 16);
}

#[test]
fn writes_to_x0_are_discarded() {
    let program = [
        I::new().addi(0, 0, 9).build(),
        I::new().add(10, 0, 0).build(),
        halt(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    assert_eq!(ctx.run().expect("halts"), 0);
    assert_eq!(ctx.get_reg(0), 0);
}

#[test]
fn auipc_adds_pc() {
    let program = [
        I::new().nop().build(),
        I::new().auipc(10, 0).build(),
        I::new().auipc(11, 1).build(),
        halt(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    let _ = ctx.run().expect("halts");
    assert_eq!(ctx.get_reg(10), 4);
    assert_eq!(ctx.get_reg(11), 0x1008);
}

// ══════════════════════════════════════════════════════════
// 4. Structural pressure
// ══════════════════════════════════════════════════════════

#[test]
fn tiny_buffers_stall_but_stay_correct() {
    let mut config = Config::default();
    config.pipeline.rob_size = 2;
    config.pipeline.rs_size = 1;
    config.pipeline.lsb_size = 1;
    config.pipeline.iq_size = 4;

    let mut ctx = TestContext::with_config(config).load_program(&count_loop(10));
    assert_eq!(ctx.run().expect("halts"), 10);
    assert!(ctx.sim.stats().decode_stalls > 0);
}

#[test]
fn empty_memory_hits_cycle_limit() {
    let mut config = Config::default();
    config.general.max_cycles = Some(200);
    let mut ctx = TestContext::with_config(config);
    assert!(ctx.run().is_err());
    assert!(!ctx.sim.is_halted());
    assert_eq!(ctx.sim.stats().instructions_committed, 0);
}
