use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub invoice_id: Option<i64>,
    pub amount: f64,
    pub payment_date: Option<String>,
    pub method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub patient_id: Option<i64>,
    pub amount: f64,
    pub status: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub due_date: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl Invoice {
    pub fn amount_paid(&self) -> f64 {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Remaining balance, never negative
    pub fn balance(&self) -> f64 {
        (self.amount - self.amount_paid()).max(0.0)
    }

    pub fn is_paid(&self) -> bool {
        self.status.as_deref() == Some("paid") || self.balance() <= f64::EPSILON
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentInput {
    pub invoice_id: i64,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Plain-language explanation from `GET /billing/invoices/{id}/explain`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceExplanation {
    pub invoice_id: Option<i64>,
    #[serde(alias = "answer")]
    pub explanation: Option<String>,
}
