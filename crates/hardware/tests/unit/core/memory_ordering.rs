//! Memory Ordering Tests.
//!
//! Loads and stores leave the load/store buffer in program order: a load
//! queued behind a store only reaches the data port after that store has
//! committed and been performed, whatever the data port latency.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::halt;
use crate::common::builder::InstructionBuilder as I;
use crate::common::harness::TestContext;
use tomasim_core::config::Config;

fn with_latency(latency: u64) -> TestContext {
    let mut config = Config::default();
    config.memory.data_latency = latency;
    TestContext::with_config(config)
}

/// Stores `6, 5, .., 1` from 0x100 upward, reloading each one into the sum.
fn store_reload_loop() -> Vec<u32> {
    vec![
        I::new().addi(1, 0, 0x100).build(), // 0
        I::new().addi(5, 0, 6).build(),     // 4
        I::new().sw(1, 5, 0).build(),       // 8
        I::new().lw(6, 1, 0).build(),       // 12
        I::new().add(10, 10, 6).build(),    // 16
        I::new().addi(1, 1, 4).build(),     // 20
        I::new().addi(5, 5, -1).build(),    // 24
        I::new().bne(5, 0, -20).build(),    // 28 -> 8
        halt(),                             // 32
    ]
}

#[rstest]
#[case::fast(1)]
#[case::default_latency(3)]
#[case::slow(12)]
fn load_sees_preceding_store(#[case] latency: u64) {
    let program = [
        I::new().addi(1, 0, 0x100).build(),
        I::new().addi(2, 0, 123).build(),
        I::new().sw(1, 2, 0).build(),
        I::new().lw(10, 1, 0).build(),
        halt(),
    ];
    let mut ctx = with_latency(latency).load_program(&program);
    assert_eq!(ctx.run().expect("halts"), 123);
    assert_eq!(ctx.cpu().memory.read(0x100, 4), 123);
}

#[rstest]
#[case::fast(1)]
#[case::default_latency(3)]
#[case::slow(9)]
fn load_address_ready_before_store_data(#[case] latency: u64) {
    // The store's data comes from a load; the younger load's address needs nothing.
    let program = [
        I::new().lw(2, 0, 0x400).build(),
        I::new().sw(0, 2, 0x100).build(),
        I::new().lw(10, 0, 0x100).build(),
        halt(),
    ];
    let mut ctx = with_latency(latency)
        .load_program(&program)
        .load_at(0x400, &[77]);
    assert_eq!(ctx.run().expect("halts"), 77);
    assert_eq!(ctx.a0(), 77);
    assert_eq!(ctx.cpu().memory.read(0x100, 4), 77);
}

#[rstest]
#[case::fast(1)]
#[case::slow(7)]
fn store_reload_loop_sums_values(#[case] latency: u64) {
    let mut ctx = with_latency(latency).load_program(&store_reload_loop());
    assert_eq!(ctx.run().expect("halts"), 21);

    let mem = &ctx.cpu().memory;
    let stored: Vec<u32> = (0..6).map(|i| mem.read(0x100 + 4 * i, 4)).collect();
    assert_eq!(stored, vec![6, 5, 4, 3, 2, 1]);
}

#[test]
fn byte_and_half_accesses_extend_correctly() {
    let program = [
        I::new().addi(1, 0, 0x200).build(),
        I::new().addi(2, 0, -2).build(),
        I::new().sb(1, 2, 3).build(),
        I::new().lb(3, 1, 3).build(),  // sign-extended: -2
        I::new().lbu(4, 1, 3).build(), // zero-extended: 254
        I::new().sh(1, 2, 8).build(),
        I::new().lhu(5, 1, 8).build(), // 0xFFFE
        I::new().add(10, 3, 4).build(),
        halt(),
    ];
    let mut ctx = TestContext::new().load_program(&program);
    assert_eq!(ctx.run().expect("halts"), 252);

    assert_eq!(ctx.get_reg(3), (-2_i32) as u32);
    assert_eq!(ctx.get_reg(4), 0xFE);
    assert_eq!(ctx.get_reg(5), 0xFFFE);
    assert_eq!(ctx.cpu().memory.read(0x200, 4), 0xFE00_0000);
}

#[test]
fn load_reads_image_data() {
    let program = [I::new().lw(10, 0, 0x400).build(), halt()];
    let mut ctx = TestContext::new()
        .load_program(&program)
        .load_at(0x400, &[0xCAFE_0042]);
    assert_eq!(ctx.run().expect("halts"), 0x42);
    assert_eq!(ctx.a0(), 0xCAFE_0042);
}

#[test]
fn final_store_lands_before_result() {
    // The store is still in flight when halt commits; draining completes it.
    let program = [
        I::new().addi(1, 0, 0x300).build(),
        I::new().addi(2, 0, 55).build(),
        I::new().sw(1, 2, 0).build(),
        halt(),
    ];
    let mut ctx = with_latency(20).load_program(&program);
    let _ = ctx.run().expect("halts");
    assert_eq!(ctx.cpu().memory.read(0x300, 4), 55);
}
