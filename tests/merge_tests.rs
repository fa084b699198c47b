//! Tests for the statement merge engine

use chrono::NaiveDate;
use statement_core::{
    DecimalSeparator, Statement, StatementError, Transaction, TransactionType,
};

/// Build the n-th transaction of a fixed ascending ledger slice
fn txn(n: u32) -> Transaction {
    let date = NaiveDate::from_ymd_opt(2024, 3, n)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    Transaction::new(
        Some(date),
        format!("PURCHASE {}", n),
        format!("-{}.00", n),
        TransactionType::Debit,
        format!("{}.00", 1000 - n),
        DecimalSeparator::Period,
    )
}

fn statement_of(ns: &[u32]) -> Statement {
    let mut s = Statement::new("12345678").unwrap();
    for &n in ns {
        s.push(txn(n));
    }
    s
}

#[test]
fn test_merge_idempotence() {
    let s = statement_of(&[1, 2, 3]);
    let merged = s.merge(&s).unwrap();
    assert_eq!(merged, s);
}

#[test]
fn test_merge_contiguous_extension() {
    let a = statement_of(&[1, 2, 3]);
    let b = statement_of(&[4, 5]);
    let merged = a.merge(&b).unwrap();
    assert_eq!(merged, statement_of(&[1, 2, 3, 4, 5]));
}

#[test]
fn test_merge_with_overlap() {
    let a = statement_of(&[1, 2, 3]);
    let c = statement_of(&[2, 3, 4, 5]);
    let merged = a.merge(&c).unwrap();
    assert_eq!(merged, statement_of(&[1, 2, 3, 4, 5]));
}

#[test]
fn test_merge_contained_subset_is_noop() {
    let a = statement_of(&[1, 2, 3]);
    let contained = statement_of(&[2, 3]);
    let merged = a.merge(&contained).unwrap();
    assert_eq!(merged, a);
}

#[test]
fn test_merge_conflict_on_non_contiguous_overlap() {
    // D shares only S2 with A and skips ahead to S5: the union would
    // interleave S5 before S3
    let a = statement_of(&[1, 2, 3]);
    let d = statement_of(&[2, 5]);
    let err = a.merge(&d).unwrap_err();
    match err {
        StatementError::MergeConflict(conflict) => {
            // Both date ranges are reported for diagnosis
            assert_eq!(conflict.left_from, txn(1).date);
            assert_eq!(conflict.left_to, txn(3).date);
            assert_eq!(conflict.right_from, txn(2).date);
            assert_eq!(conflict.right_to, txn(5).date);
            assert_eq!(conflict.offending, "PURCHASE 5");
        }
        other => panic!("expected MergeConflict, got {:?}", other),
    }
}

#[test]
fn test_merge_conflict_does_not_mutate_target() {
    let mut a = statement_of(&[1, 2, 3]);
    let d = statement_of(&[2, 5]);
    assert!(a.merge_from(&d).is_err());
    assert_eq!(a, statement_of(&[1, 2, 3]));
}

#[test]
fn test_merge_in_place_matches_non_mutating() {
    let mut a = statement_of(&[1, 2, 3]);
    let b = statement_of(&[3, 4, 5]);
    let merged = a.merge(&b).unwrap();
    a.merge_from(&b).unwrap();
    assert_eq!(a, merged);
}

#[test]
fn test_merge_rederives_balances_and_dates() {
    let mut a = statement_of(&[1, 2, 3]);
    a.finalize();
    assert_eq!(a.closing_balance().unwrap(), "999.00");
    assert_eq!(a.to_date(), txn(3).date);

    let b = statement_of(&[4, 5]);
    let merged = a.merge(&b).unwrap();

    // Derived fields are cleared on merge and re-derive from the new list
    assert_eq!(merged.closing_balance().unwrap(), "999.00");
    assert_eq!(merged.closing_available().unwrap(), "999.00");
    assert_eq!(merged.from_date(), txn(1).date);
    assert_eq!(merged.to_date(), txn(5).date);
}

#[test]
fn test_merge_preserves_relative_order_of_novel_tail() {
    let a = statement_of(&[1, 2]);
    let b = statement_of(&[2, 3, 4]);
    let merged = a.merge(&b).unwrap();
    let descriptions: Vec<&str> = merged
        .transactions()
        .iter()
        .map(|t| t.description())
        .collect();
    assert_eq!(
        descriptions,
        vec!["PURCHASE 1", "PURCHASE 2", "PURCHASE 3", "PURCHASE 4"]
    );
}
