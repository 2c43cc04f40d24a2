//! Tests for budget status calculation.

use chrono::{Days, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use spendwise_shared::types::{BudgetId, ExpenseId, UserId};

use super::status::{calculate_budget_status, is_attributed};
use super::types::{Budget, BudgetHealth, BudgetPeriod};
use crate::expense::Expense;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn budget(category: &str, amount: Decimal, start: NaiveDate, end: Option<NaiveDate>) -> Budget {
    Budget {
        id: BudgetId::new(),
        user_id: UserId::new(),
        category: category.to_string(),
        amount,
        period: BudgetPeriod::Monthly,
        start_date: start,
        end_date: end,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn expense(category: &str, amount: Decimal, on: NaiveDate) -> Expense {
    Expense {
        id: ExpenseId::new(),
        user_id: UserId::new(),
        amount,
        category: category.to_string(),
        date: on,
        name: None,
        description: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn january_food() -> Budget {
    budget("Food", dec!(200), date(2024, 1, 1), Some(date(2024, 1, 31)))
}

fn january_expenses() -> Vec<Expense> {
    vec![
        expense("Food", dec!(150), date(2024, 1, 15)),
        expense("Food", dec!(60), date(2024, 2, 1)),
        expense("Transportation", dec!(500), date(2024, 1, 10)),
    ]
}

#[test]
fn test_only_matching_category_inside_window_counts() {
    let status = calculate_budget_status(&january_food(), &january_expenses(), date(2024, 3, 1));

    assert_eq!(status.total_spent, dec!(150));
    assert_eq!(status.remaining, dec!(50));
    assert_eq!(status.percentage_spent, dec!(75));
    assert_eq!(status.status, BudgetHealth::Under);
}

#[test]
fn test_reaching_ninety_five_percent_warns() {
    let mut expenses = january_expenses();
    expenses.push(expense("Food", dec!(40), date(2024, 1, 20)));

    let status = calculate_budget_status(&january_food(), &expenses, date(2024, 3, 1));

    assert_eq!(status.total_spent, dec!(190));
    assert_eq!(status.remaining, dec!(10));
    assert_eq!(status.percentage_spent, dec!(95));
    assert_eq!(status.status, BudgetHealth::Warning);
}

#[test]
fn test_overspending_goes_negative() {
    let mut expenses = january_expenses();
    expenses.push(expense("Food", dec!(40), date(2024, 1, 20)));
    expenses.push(expense("Food", dec!(20), date(2024, 1, 25)));

    let status = calculate_budget_status(&january_food(), &expenses, date(2024, 3, 1));

    assert_eq!(status.total_spent, dec!(210));
    assert_eq!(status.remaining, dec!(-10));
    assert_eq!(status.percentage_spent, dec!(105));
    assert_eq!(status.status, BudgetHealth::Over);
}

#[test]
fn test_threshold_boundaries() {
    assert_eq!(BudgetHealth::classify(dec!(79.999)), BudgetHealth::Under);
    assert_eq!(BudgetHealth::classify(dec!(80)), BudgetHealth::Warning);
    assert_eq!(BudgetHealth::classify(dec!(99.99)), BudgetHealth::Warning);
    assert_eq!(BudgetHealth::classify(dec!(100)), BudgetHealth::Over);
    assert_eq!(BudgetHealth::classify(dec!(250)), BudgetHealth::Over);
}

#[test]
fn test_inclusive_bounds() {
    let b = january_food();
    let today = date(2024, 6, 1);

    assert!(is_attributed(&b, &expense("Food", dec!(1), date(2024, 1, 1)), today));
    assert!(is_attributed(&b, &expense("Food", dec!(1), date(2024, 1, 31)), today));
    assert!(!is_attributed(&b, &expense("Food", dec!(1), date(2023, 12, 31)), today));
    assert!(!is_attributed(&b, &expense("Food", dec!(1), date(2024, 2, 1)), today));
}

#[test]
fn test_open_ended_budget_runs_through_today() {
    let b = budget("Food", dec!(100), date(2024, 1, 1), None);
    let today = date(2024, 3, 10);
    let expenses = vec![
        expense("Food", dec!(10), date(2024, 1, 1)),
        expense("Food", dec!(20), date(2024, 2, 15)),
        expense("Food", dec!(30), today),
        expense("Food", dec!(40), date(2024, 3, 11)),
    ];

    let status = calculate_budget_status(&b, &expenses, today);

    assert_eq!(status.total_spent, dec!(60));
    assert_eq!(status.percentage_spent, dec!(60));
}

#[test]
fn test_category_must_match_exactly() {
    let b = january_food();
    let today = date(2024, 6, 1);
    for category in ["food", "FOOD", " Food", "Food ", "Foods", ""] {
        assert!(
            !is_attributed(&b, &expense(category, dec!(5), date(2024, 1, 10)), today),
            "{category:?} should not be attributed"
        );
    }
}

#[test]
fn test_zero_amount_budget_does_not_panic() {
    let b = budget("Food", Decimal::ZERO, date(2024, 1, 1), None);
    let status = calculate_budget_status(&b, &january_expenses(), date(2024, 1, 31));

    assert_eq!(status.total_spent, dec!(150));
    assert_eq!(status.percentage_spent, Decimal::ZERO);
}

#[test]
fn test_unrepresentable_percentage_saturates_to_over() {
    let b = budget("Food", Decimal::new(1, 10), date(2024, 1, 1), None);
    let expenses = vec![expense(
        "Food",
        Decimal::from(10_000_000_000_000_000_000_u64),
        date(2024, 1, 5),
    )];

    let status = calculate_budget_status(&b, &expenses, date(2024, 1, 31));

    assert_eq!(status.total_spent, Decimal::from(10_000_000_000_000_000_000_u64));
    assert_eq!(status.percentage_spent, Decimal::MAX);
    assert_eq!(status.status, BudgetHealth::Over);
}

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_expense(start: NaiveDate) -> impl Strategy<Value = Expense> {
    (
        prop::sample::select(vec!["Food", "food", "Travel", "Food "]),
        arb_amount(),
        0u64..120,
    )
        .prop_map(move |(category, amount, offset)| {
            expense(category, amount, start.checked_add_days(Days::new(offset)).unwrap())
        })
}

proptest! {
    /// A budget with nothing attributed is untouched: spent 0, remaining = amount, under.
    #[test]
    fn prop_no_expenses_means_untouched(cents in 1i64..1_000_000_000) {
        let amount = Decimal::new(cents, 2);
        let b = budget("Food", amount, date(2024, 1, 1), None);

        let status = calculate_budget_status(&b, &[], date(2024, 6, 1));

        prop_assert_eq!(status.total_spent, Decimal::ZERO);
        prop_assert_eq!(status.remaining, amount);
        prop_assert_eq!(status.percentage_spent, Decimal::ZERO);
        prop_assert_eq!(status.status, BudgetHealth::Under);
    }

    /// remaining == amount - total_spent for any input.
    #[test]
    fn prop_remaining_is_amount_minus_spent(
        cents in 1i64..1_000_000_000,
        expenses in prop::collection::vec(arb_expense(date(2024, 1, 1)), 0..30),
    ) {
        let b = budget("Food", Decimal::new(cents, 2), date(2024, 1, 15), Some(date(2024, 3, 15)));

        let status = calculate_budget_status(&b, &expenses, date(2024, 6, 1));

        prop_assert_eq!(status.remaining, b.amount - status.total_spent);
        prop_assert!(status.total_spent >= Decimal::ZERO);
    }

    /// Adding an attributed positive expense never decreases spent or percentage,
    /// and never lowers the severity.
    #[test]
    fn prop_adding_attributed_expense_is_monotonic(
        cents in 1i64..1_000_000_000,
        expenses in prop::collection::vec(arb_expense(date(2024, 1, 1)), 0..30),
        extra in 1i64..1_000_000,
        offset in 0u64..60,
    ) {
        let b = budget("Food", Decimal::new(cents, 2), date(2024, 1, 1), Some(date(2024, 3, 1)));
        let today = date(2024, 6, 1);
        let before = calculate_budget_status(&b, &expenses, today);

        let mut more = expenses.clone();
        more.push(expense(
            "Food",
            Decimal::new(extra, 2),
            date(2024, 1, 1).checked_add_days(Days::new(offset)).unwrap(),
        ));
        let after = calculate_budget_status(&b, &more, today);

        prop_assert!(after.total_spent > before.total_spent);
        prop_assert!(after.percentage_spent >= before.percentage_spent);
        prop_assert!(after.status >= before.status);
    }

    /// Expenses outside the window or with a different category never change the status.
    #[test]
    fn prop_unattributed_expenses_are_ignored(
        expenses in prop::collection::vec(arb_expense(date(2024, 1, 1)), 0..30),
    ) {
        let b = budget("Food", dec!(500), date(2024, 2, 1), Some(date(2024, 2, 29)));
        let today = date(2024, 6, 1);
        let attributed: Vec<Expense> = expenses
            .iter()
            .filter(|e| is_attributed(&b, e, today))
            .cloned()
            .collect();

        prop_assert_eq!(
            calculate_budget_status(&b, &expenses, today),
            calculate_budget_status(&b, &attributed, today)
        );
        for e in &attributed {
            prop_assert_eq!(e.category.as_str(), "Food");
        }
    }
}
