use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{Invoice, InvoiceExplanation, InvoiceInput, Payment, PaymentInput};

impl ApiClient {
    pub async fn list_invoices(&self, patient_id: Option<i64>) -> Result<Vec<Invoice>, ApiError> {
        self.fetch(ApiRequest::get("/billing/invoices").query_opt("patient_id", patient_id))
            .await
    }

    pub async fn get_invoice(&self, id: i64) -> Result<Invoice, ApiError> {
        self.get_json(&format!("/billing/invoices/{}", id)).await
    }

    pub async fn create_invoice(&self, input: &InvoiceInput) -> Result<Invoice, ApiError> {
        self.post_json("/billing/invoices", input).await
    }

    pub async fn update_invoice(&self, id: i64, input: &InvoiceInput) -> Result<Invoice, ApiError> {
        self.put_json(&format!("/billing/invoices/{}", id), input).await
    }

    pub async fn delete_invoice(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/billing/invoices/{}", id)).await
    }

    pub async fn list_payments(&self, invoice_id: i64) -> Result<Vec<Payment>, ApiError> {
        self.get_json(&format!("/billing/invoices/{}/payments", invoice_id))
            .await
    }

    pub async fn create_payment(&self, input: &PaymentInput) -> Result<Payment, ApiError> {
        self.post_json("/billing/payments", input).await
    }

    pub async fn explain_invoice(&self, id: i64) -> Result<InvoiceExplanation, ApiError> {
        self.get_json(&format!("/billing/invoices/{}/explain", id))
            .await
    }
}
