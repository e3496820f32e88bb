//! Sequential bankroll accounting across patterns.
//!
//! Patterns are simulated independently, then their balances are applied to a
//! single account in pattern order. While the account sits below the
//! operating minimum, further patterns are skipped and an alert is recorded.

use serde::{Deserialize, Serialize};
use tracing::warn;

use ladderlab_core::engine::AggregateResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankrollEntry {
    pub pattern: String,
    pub balance_before: f64,
    pub change: f64,
    pub balance_after: f64,
    /// `(balance_after - initial) / initial * 100`.
    pub cumulative_roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BankrollAlert {
    /// Pattern not played: the balance was already below the operating minimum.
    Skipped { pattern: String, balance: f64 },
    /// Applying the pattern's balance took the account below the operating minimum.
    DroppedBelowMinimum { pattern: String, balance: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskGrade {
    /// The lowest balance went negative.
    Bankrupt,
    /// The lowest balance could not fund a full ladder.
    High,
    /// More than half the initial balance was lost at some point.
    Medium,
    Low,
}

impl RiskGrade {
    pub fn classify(lowest: f64, initial: f64, operating_minimum: f64) -> Self {
        if lowest < 0.0 {
            RiskGrade::Bankrupt
        } else if lowest < operating_minimum {
            RiskGrade::High
        } else if lowest < initial * 0.5 {
            RiskGrade::Medium
        } else {
            RiskGrade::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationGrade {
    Excellent,
    Good,
    Positive,
    SmallLoss,
    SignificantLoss,
}

impl EvaluationGrade {
    /// Grade a bankroll ROI expressed in percent.
    pub fn classify(roi: f64) -> Self {
        if roi > 20.0 {
            EvaluationGrade::Excellent
        } else if roi > 5.0 {
            EvaluationGrade::Good
        } else if roi > 0.0 {
            EvaluationGrade::Positive
        } else if roi > -10.0 {
            EvaluationGrade::SmallLoss
        } else {
            EvaluationGrade::SignificantLoss
        }
    }
}

/// Final state of the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankrollSummary {
    pub initial: f64,
    pub operating_minimum: f64,
    pub final_balance: f64,
    pub lowest_balance: f64,
    pub net_profit: f64,
    pub roi: f64,
    pub patterns_applied: usize,
    pub patterns_skipped: usize,
    pub risk: RiskGrade,
    pub evaluation: EvaluationGrade,
    pub history: Vec<BankrollEntry>,
    pub alerts: Vec<BankrollAlert>,
}

#[derive(Debug, Clone)]
pub struct Bankroll {
    initial: f64,
    operating_minimum: f64,
    balance: f64,
    lowest: f64,
    skipped: usize,
    history: Vec<BankrollEntry>,
    alerts: Vec<BankrollAlert>,
}

impl Bankroll {
    pub fn new(initial: f64, operating_minimum: f64) -> Self {
        Self {
            initial,
            operating_minimum,
            balance: initial,
            lowest: initial,
            skipped: 0,
            history: Vec::new(),
            alerts: Vec::new(),
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn lowest(&self) -> f64 {
        self.lowest
    }

    pub fn can_operate(&self) -> bool {
        self.balance >= self.operating_minimum
    }

    pub fn alerts(&self) -> &[BankrollAlert] {
        &self.alerts
    }

    /// Apply one pattern's result. Returns the history entry when the balance
    /// was actually applied; patterns without triggers leave no entry.
    pub fn apply(&mut self, result: &AggregateResult) -> Option<&BankrollEntry> {
        if !self.can_operate() {
            warn!(
                pattern = %result.pattern,
                balance = self.balance,
                minimum = self.operating_minimum,
                "bankroll below operating minimum, skipping pattern"
            );
            self.skipped += 1;
            self.alerts.push(BankrollAlert::Skipped {
                pattern: result.pattern.clone(),
                balance: self.balance,
            });
            return None;
        }
        if result.trigger_count == 0 {
            return None;
        }

        let balance_before = self.balance;
        self.balance += result.balance;
        self.lowest = self.lowest.min(self.balance);

        if self.balance < self.operating_minimum {
            warn!(
                pattern = %result.pattern,
                balance = self.balance,
                minimum = self.operating_minimum,
                "bankroll dropped below operating minimum"
            );
            self.alerts.push(BankrollAlert::DroppedBelowMinimum {
                pattern: result.pattern.clone(),
                balance: self.balance,
            });
        }

        self.history.push(BankrollEntry {
            pattern: result.pattern.clone(),
            balance_before,
            change: result.balance,
            balance_after: self.balance,
            cumulative_roi: self.roi(),
        });
        self.history.last()
    }

    fn roi(&self) -> f64 {
        (self.balance - self.initial) / self.initial * 100.0
    }

    pub fn finish(self) -> BankrollSummary {
        let roi = self.roi();
        BankrollSummary {
            initial: self.initial,
            operating_minimum: self.operating_minimum,
            final_balance: self.balance,
            lowest_balance: self.lowest,
            net_profit: self.balance - self.initial,
            roi,
            patterns_applied: self.history.len(),
            patterns_skipped: self.skipped,
            risk: RiskGrade::classify(self.lowest, self.initial, self.operating_minimum),
            evaluation: EvaluationGrade::classify(roi),
            history: self.history,
            alerts: self.alerts,
        }
    }
}
