//! Branch Prediction Tests.
//!
//! Runs loops whose backward branch is taken until the final iteration and
//! checks that the 2-bit counters learn the pattern: only the first and the
//! last iteration mispredict, whatever the trip count.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::instruction::halt;
use crate::common::builder::InstructionBuilder as I;
use crate::common::harness::TestContext;
use tomasim_core::config::Config;

const BRANCH_PC: u32 = 16;

fn count_loop(n: i32) -> Vec<u32> {
    vec![
        I::new().addi(10, 0, 0).build(),
        I::new().addi(5, 0, n).build(),
        I::new().addi(10, 10, 1).build(),
        I::new().addi(5, 5, -1).build(),
        I::new().bne(5, 0, -8).build(), // BRANCH_PC
        halt(),
    ]
}

#[rstest]
#[case(3)]
#[case(20)]
#[case(100)]
fn loop_branch_mispredicts_only_at_entry_and_exit(#[case] n: i32) {
    let mut ctx = TestContext::new().load_program(&count_loop(n));
    assert_eq!(ctx.run().expect("halts"), n as u8);

    let stats = ctx.sim.stats();
    assert_eq!(stats.branches, n as u64);
    assert_eq!(stats.branch_correct, n as u64 - 2);
    assert_eq!(stats.flushes, 2);

    let predictor = &ctx.cpu().predictor;
    let expected = (n - 2) as f64 / n as f64;
    let slot = predictor.slot_accuracy(BRANCH_PC).expect("branch resolved");
    assert!((slot - expected).abs() < 1e-9, "slot accuracy {slot}");
    // Saturated taken, then one not-taken step back.
    assert_eq!(predictor.counter(BRANCH_PC), 0b10);
    assert!(predictor.predict(BRANCH_PC));
}

#[test]
fn accuracy_approaches_one_for_long_loops() {
    let mut ctx = TestContext::new().load_program(&count_loop(200));
    let _ = ctx.run().expect("halts");
    let accuracy = ctx.sim.stats().branch_accuracy().expect("branches ran");
    assert!(accuracy > 0.98, "accuracy {accuracy}");
}

#[test]
fn aliasing_slots_share_a_counter() {
    // With four entries the branch at 16 shares slot 0 with pc 0.
    let mut config = Config::default();
    config.pipeline.predictor_entries = 4;
    let mut ctx = TestContext::with_config(config).load_program(&count_loop(6));
    assert_eq!(ctx.run().expect("halts"), 6);

    let predictor = &ctx.cpu().predictor;
    assert_eq!(predictor.index(0), predictor.index(BRANCH_PC));
    assert_eq!(predictor.counter(0), predictor.counter(BRANCH_PC));
    assert_eq!(predictor.lookups(), 6);
}

#[test]
fn straight_line_code_has_no_branch_statistics() {
    let program = [I::new().addi(10, 0, 1).build(), halt()];
    let mut ctx = TestContext::new().load_program(&program);
    let _ = ctx.run().expect("halts");
    assert_eq!(ctx.sim.stats().branches, 0);
    assert_eq!(ctx.sim.stats().branch_accuracy(), None);
}
