use loan_ledger_core::payment::{self, PaymentSchedule};
use loan_ledger_core::{LedgerError, LoanInput, LoanStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Calculator
// ===========================================================================

#[test]
fn test_monthly_payment_matches_simple_interest_formula() {
    let cases = [
        (dec!(10000), dec!(5), 12i32),
        (dec!(2500), dec!(0), 7),
        (dec!(75000), dec!(12.5), 36),
        (dec!(1), dec!(1), 1),
        (dec!(999.99), dec!(3.25), 5),
    ];
    for (principal, rate, term) in cases {
        let expected =
            ((principal * rate / dec!(100) + principal) / Decimal::from(term)).round_dp(2);
        assert_eq!(
            payment::monthly_payment(principal, rate, term).unwrap(),
            expected,
            "principal={principal} rate={rate} term={term}"
        );
    }
}

#[test]
fn test_non_positive_term_yields_zero_for_any_principal() {
    for principal in [dec!(0), dec!(1), dec!(1_000_000)] {
        for term in [0, -1, -3, -120] {
            assert_eq!(
                payment::monthly_payment(principal, dec!(5), term).unwrap(),
                Decimal::ZERO,
                "principal={principal} term={term}"
            );
        }
    }
}

#[test]
fn test_unrepresentable_principal_is_overflow_not_panic() {
    let err = payment::monthly_payment(Decimal::MAX, dec!(5), 12).unwrap_err();
    assert!(matches!(err, LedgerError::Overflow { .. }));
}

#[test]
fn test_total_paid_reference_loan() {
    let monthly = payment::monthly_payment(dec!(10000), dec!(5), 12).unwrap();
    assert_eq!(payment::total_paid(monthly, 12).unwrap(), dec!(10500.00));
}

#[test]
fn test_settled_override_ignores_inputs() {
    for (principal, rate, term) in [(dec!(10000), dec!(5), 12i32), (dec!(1), dec!(99), -4)] {
        assert_eq!(
            PaymentSchedule::for_status(principal, rate, term, LoanStatus::Settled).unwrap(),
            PaymentSchedule::ZERO
        );
    }
}

// ===========================================================================
// Quote
// ===========================================================================

#[test]
fn test_quote_reference_loan() {
    let input = LoanInput {
        borrower_name: "Cruz".into(),
        principal: dec!(10000),
        term_months: 12,
        interest_rate: dec!(5),
        status: LoanStatus::Approved,
    };
    let out = payment::quote(&input).unwrap();
    assert_eq!(out.result.monthly_payment, dec!(875));
    assert_eq!(out.result.total_paid, dec!(10500));
    assert_eq!(out.result.total_interest, dec!(500));
    assert!(out.warnings.is_empty());
    assert_eq!(out.assumptions["borrower_name"], "Cruz");
}

#[test]
fn test_quote_settled_warns() {
    let input = LoanInput {
        borrower_name: "Cruz".into(),
        principal: dec!(10000),
        term_months: 12,
        interest_rate: dec!(5),
        status: LoanStatus::Settled,
    };
    let out = payment::quote(&input).unwrap();
    assert_eq!(out.result.total_paid, Decimal::ZERO);
    assert!(out.warnings.iter().any(|w| w.contains("Settled")));
}

#[test]
fn test_quote_unrepresentable_principal_is_overflow() {
    let input = LoanInput {
        borrower_name: "Cruz".into(),
        principal: Decimal::MAX,
        term_months: 12,
        interest_rate: dec!(5),
        status: LoanStatus::Approved,
    };
    assert!(matches!(
        payment::quote(&input),
        Err(LedgerError::Overflow { .. })
    ));
}
