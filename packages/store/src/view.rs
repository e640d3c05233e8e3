//! # Derived view: filters, totals and metrics over a store snapshot
//!
//! Everything here is a pure function of its inputs. Calling it twice on the same
//! snapshot gives the same answer; nothing is cached.
//!
//! Amounts keep full [`Decimal`] precision. [`format_currency`] rounds to two fraction
//! digits for display only.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{LenderType, Loan, LoanStatus, PriorityBand, Task};

/// Search box and lender-type filter of the loans page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoanQuery {
    pub search: String,
    /// `None` means all types.
    pub lender_type: Option<LenderType>,
}

impl LoanQuery {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.lender_type.is_none()
    }

    pub fn matches_search(&self, loan: &Loan) -> bool {
        let needle = self.search.to_lowercase();
        needle.is_empty() || loan.lender_name.to_lowercase().contains(&needle)
    }

    pub fn matches_type(&self, loan: &Loan) -> bool {
        self.lender_type.is_none_or(|t| loan.lender_type == t)
    }

    pub fn matches(&self, loan: &Loan) -> bool {
        self.matches_search(loan) && self.matches_type(loan)
    }

    /// Loans matching both filters, in store order.
    pub fn apply<'a>(&self, loans: &'a [Loan]) -> Vec<&'a Loan> {
        loans.iter().filter(|l| self.matches(l)).collect()
    }
}

/// Aggregates shown in the loan metric cards. Sums saturate at the `Decimal` range.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoanTotals {
    pub count: usize,
    /// Sum of `amount`.
    pub principal: Decimal,
    /// Sum of `remaining_balance`.
    pub remaining: Decimal,
    pub active: usize,
    pub paid_off: usize,
    pub defaulted: usize,
}

impl LoanTotals {
    pub fn of<'a>(loans: impl IntoIterator<Item = &'a Loan>) -> Self {
        loans.into_iter().fold(Self::default(), |mut totals, loan| {
            totals.count += 1;
            totals.principal = totals.principal.saturating_add(loan.amount);
            totals.remaining = totals.remaining.saturating_add(loan.remaining_balance);
            match loan.status {
                LoanStatus::Active => totals.active += 1,
                LoanStatus::PaidOff => totals.paid_off += 1,
                LoanStatus::Default => totals.defaulted += 1,
            }
            totals
        })
    }

    /// Principal already paid back.
    pub fn repaid(&self) -> Decimal {
        self.principal.saturating_sub(self.remaining)
    }
}

/// Counts shown in the task metric cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskMetrics {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TaskMetrics {
    pub fn of<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut m, task| {
            m.total += 1;
            match task.band() {
                PriorityBand::High => m.high += 1,
                PriorityBand::Medium => m.medium += 1,
                PriorityBand::Low => m.low += 1,
            }
            m
        })
    }
}

/// Highest priority first; equal priorities keep store order.
pub fn tasks_by_priority(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
    sorted
}

/// Column the loans table is ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoanSort {
    #[default]
    Store,
    LenderName,
    /// Earliest first, loans without a due date last.
    DueDate,
    /// Largest remaining balance first.
    Remaining,
}

impl LoanSort {
    pub const ALL: [LoanSort; 4] = [
        LoanSort::Store,
        LoanSort::LenderName,
        LoanSort::DueDate,
        LoanSort::Remaining,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Store => "Default",
            Self::LenderName => "Lender",
            Self::DueDate => "Due date",
            Self::Remaining => "Remaining",
        }
    }

    pub fn parse(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.label() == label)
            .unwrap_or_default()
    }

    pub fn sort(&self, loans: &mut [&Loan]) {
        match self {
            Self::Store => {}
            Self::LenderName => loans.sort_by_key(|l| l.lender_name.to_lowercase()),
            Self::DueDate => loans.sort_by(|a, b| by_due_date(a, b)),
            Self::Remaining => {
                loans.sort_by(|a, b| b.remaining_balance.cmp(&a.remaining_balance))
            }
        }
    }
}

fn by_due_date(a: &Loan, b: &Loan) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Everything the dashboard shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardSummary {
    pub tasks: TaskMetrics,
    pub loans: LoanTotals,
    /// Open loan with the earliest due date on or after today.
    pub next_due: Option<Loan>,
    /// Open loans whose due date has passed.
    pub overdue: usize,
}

impl DashboardSummary {
    pub fn of(tasks: &[Task], loans: &[Loan], today: NaiveDate) -> Self {
        let open = loans.iter().filter(|l| !l.is_paid_off());
        let next_due = open
            .clone()
            .filter(|l| l.due_date.is_some_and(|d| d >= today))
            .min_by(|a, b| by_due_date(a, b))
            .cloned();
        let overdue = open
            .filter(|l| l.due_date.is_some_and(|d| d < today))
            .count();
        Self {
            tasks: TaskMetrics::of(tasks),
            loans: LoanTotals::of(loans),
            next_due,
            overdue,
        }
    }
}

/// `₹1,23,456.70`: two fraction digits, Indian digit grouping.
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((&text, "00"));
    let sign = if negative { "-" } else { "" };
    format!("{sign}{symbol}{}.{fraction}", group_indian(whole))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, last3) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (h, tail) = rest.split_at(rest.len() - 2);
        groups.push(tail);
        rest = h;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{last3}", groups.join(","))
}

/// `15 Jan 2025`, or `-` when unset.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::models::Id;

    fn loan(id: Id, name: &str, lender_type: LenderType, amount: i64, remaining: i64) -> Loan {
        Loan {
            id,
            lender_name: name.to_string(),
            lender_type,
            amount: Decimal::from(amount),
            interest_rate: Decimal::ZERO,
            taken_date: None,
            due_date: None,
            repayment_terms: None,
            notes: None,
            status: if remaining == 0 {
                LoanStatus::PaidOff
            } else {
                LoanStatus::Active
            },
            remaining_balance: Decimal::from(remaining),
            user_id: Some(1),
        }
    }

    fn task(id: Id, priority: u8) -> Task {
        Task {
            id,
            task: format!("task {id}"),
            priority,
            user_id: Some(1),
        }
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let loans = vec![
            loan(1, "HDFC Bank", LenderType::Bank, 1000, 500),
            loan(2, "Ravi", LenderType::Person, 200, 200),
            loan(3, "hdfc credila", LenderType::Other, 300, 0),
        ];
        let query = LoanQuery {
            search: "HdFc".to_string(),
            lender_type: None,
        };
        let ids: Vec<Id> = query.apply(&loans).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let query = LoanQuery {
            search: "hdfc".to_string(),
            lender_type: Some(LenderType::Bank),
        };
        assert_eq!(query.apply(&loans).len(), 1);
    }

    #[test]
    fn test_totals_and_counts() {
        let loans = vec![
            loan(1, "A", LenderType::Bank, 1000, 500),
            loan(2, "B", LenderType::Person, 200, 0),
        ];
        let totals = LoanTotals::of(&loans);
        assert_eq!(totals.principal, Decimal::from(1200));
        assert_eq!(totals.remaining, Decimal::from(500));
        assert_eq!(totals.repaid(), Decimal::from(700));
        assert_eq!((totals.active, totals.paid_off, totals.defaulted), (1, 1, 0));
        assert_eq!(LoanTotals::of(&loans), totals);
    }

    #[test]
    fn test_search_is_a_literal_substring() {
        let loans = vec![
            loan(1, "HDFC Bank", LenderType::Bank, 1000, 500),
            loan(2, "Ravi", LenderType::Person, 200, 200),
        ];
        let query = LoanQuery {
            search: " ".to_string(),
            lender_type: None,
        };
        assert!(!query.is_empty());
        let ids: Vec<Id> = query.apply(&loans).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let mut a = loan(1, "A", LenderType::Bank, 0, 0);
        a.amount = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        a.remaining_balance = a.amount;
        let mut b = a.clone();
        b.id = 2;
        let totals = LoanTotals::of([&a, &b]);
        assert_eq!(totals.principal, Decimal::MAX);
        assert_eq!(totals.remaining, Decimal::MAX);
        assert_eq!(totals.repaid(), Decimal::ZERO);
        assert_eq!(totals.count, 2);
    }

    #[test]
    fn test_task_metrics_bands() {
        let tasks = vec![task(1, 9), task(2, 8), task(3, 7), task(4, 4), task(5, 1)];
        let m = TaskMetrics::of(&tasks);
        assert_eq!(m, TaskMetrics { total: 5, high: 2, medium: 2, low: 1 });
    }

    #[test]
    fn test_tasks_by_priority_is_stable() {
        let tasks = vec![task(1, 5), task(2, 9), task(3, 5)];
        let ids: Vec<Id> = tasks_by_priority(&tasks).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_by_due_date_puts_undated_last() {
        let mut a = loan(1, "A", LenderType::Bank, 10, 10);
        let b = loan(2, "B", LenderType::Bank, 10, 10);
        let mut c = loan(3, "C", LenderType::Bank, 10, 10);
        a.due_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        c.due_date = NaiveDate::from_ymd_opt(2025, 3, 1);
        let loans = [a, b, c];
        let mut view: Vec<&Loan> = loans.iter().collect();
        LoanSort::DueDate.sort(&mut view);
        let ids: Vec<Id> = view.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_parse_falls_back_to_store_order() {
        assert_eq!(LoanSort::parse("Remaining"), LoanSort::Remaining);
        assert_eq!(LoanSort::parse("bogus"), LoanSort::Store);
    }

    #[test]
    fn test_dashboard_next_due_skips_paid_and_past() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let mut past = loan(1, "Past", LenderType::Bank, 10, 10);
        past.due_date = NaiveDate::from_ymd_opt(2025, 3, 1);
        let mut paid = loan(2, "Paid", LenderType::Bank, 10, 0);
        paid.due_date = NaiveDate::from_ymd_opt(2025, 4, 2);
        let mut next = loan(3, "Next", LenderType::Bank, 10, 5);
        next.due_date = NaiveDate::from_ymd_opt(2025, 5, 1);

        let summary = DashboardSummary::of(&[task(1, 9)], &[past, paid, next], today);
        assert_eq!(summary.next_due.map(|l| l.id), Some(3));
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.tasks.high, 1);
        assert_eq!(summary.loans.count, 3);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Decimal::new(12345670, 2), "₹"), "₹1,23,456.70");
        assert_eq!(format_currency(Decimal::new(999, 0), "₹"), "₹999.00");
        assert_eq!(format_currency(Decimal::new(1000, 0), "₹"), "₹1,000.00");
        assert_eq!(format_currency(Decimal::new(10005, 3), "₹"), "₹10.01");
        assert_eq!(format_currency(Decimal::new(-150000, 2), "$"), "-$1,500.00");
        assert_eq!(format_currency(Decimal::from(100_000_000), "₹"), "₹10,00,00,000.00");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2025, 1, 15)), "15 Jan 2025");
        assert_eq!(format_date(None), "-");
    }

    fn arb_loan() -> impl Strategy<Value = Loan> {
        (
            1i64..1000,
            prop::sample::select(vec!["HDFC Bank", "Ravi", "SBI", "Uncle Raj", "hdfc"]),
            prop::sample::select(LenderType::ALL.to_vec()),
            0i64..10_000_000,
            0u32..=100,
        )
            .prop_map(|(id, name, lender_type, cents, paid_pct)| {
                let amount = Decimal::new(cents, 2);
                let remaining = amount - amount * Decimal::from(paid_pct) / Decimal::from(100);
                let mut l = loan(id, name, lender_type, 0, 1);
                l.amount = amount;
                l.remaining_balance = remaining;
                l
            })
    }

    fn arb_query() -> impl Strategy<Value = LoanQuery> {
        (
            prop::sample::select(vec!["", "hdfc", "R", "bank", "zzz"]),
            prop::option::of(prop::sample::select(LenderType::ALL.to_vec())),
        )
            .prop_map(|(search, lender_type)| LoanQuery {
                search: search.to_string(),
                lender_type,
            })
    }

    proptest! {
        #[test]
        fn prop_remaining_never_exceeds_principal(
            loans in prop::collection::vec(arb_loan(), 0..40),
            query in arb_query(),
        ) {
            let totals = LoanTotals::of(query.apply(&loans));
            prop_assert!(totals.remaining <= totals.principal);
        }

        #[test]
        fn prop_type_and_search_filters_commute(
            loans in prop::collection::vec(arb_loan(), 0..40),
            query in arb_query(),
        ) {
            let type_first: Vec<&Loan> = loans
                .iter()
                .filter(|l| query.matches_type(l))
                .filter(|l| query.matches_search(l))
                .collect();
            let search_first: Vec<&Loan> = loans
                .iter()
                .filter(|l| query.matches_search(l))
                .filter(|l| query.matches_type(l))
                .collect();
            prop_assert_eq!(&type_first, &search_first);
            prop_assert_eq!(type_first, query.apply(&loans));
        }

        #[test]
        fn prop_view_is_idempotent(loans in prop::collection::vec(arb_loan(), 0..20)) {
            prop_assert_eq!(LoanTotals::of(&loans), LoanTotals::of(&loans));
        }
    }
}
