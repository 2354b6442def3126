//! Data models for EHR backend entities.
//!
//! This module contains the typed request and response shapes used by the
//! endpoint layer:
//!
//! - `User`, `LoginResponse`, `RegisterInput`: accounts and sessions
//! - `Patient`: demographic records
//! - `Appointment`, `Observation`, `Encounter`, `MedicalRecord`: clinical data
//! - `Prescription`, `TreatmentPlan`: medications
//! - `Invoice`, `Payment`: billing
//! - `ChatRoom`, `ChatMessage`: chat rooms and bot replies
//! - `TelemedicineSession`: video visits
//! - `MetricsQuestion`: dashboard metrics; metric payloads stay untyped JSON
//!
//! Input types serialize only the fields that are set, so the same type
//! serves both create and partial update calls.

pub mod billing;
pub mod chat;
pub mod clinical;
pub mod dashboard;
pub mod medication;
pub mod patient;
pub mod telemedicine;
pub mod user;

pub use billing::{Invoice, InvoiceExplanation, InvoiceInput, Payment, PaymentInput};
pub use chat::{
    ChatMessage, ChatRoom, ChatRoomInput, MessageRole, PostMessageInput, PostMessageResponse,
    SendMessageInput,
};
pub use clinical::{
    Appointment, AppointmentInput, Encounter, EncounterInput, MedicalRecord, MedicalRecordInput,
    Observation, ObservationInput,
};
pub use dashboard::MetricsQuestion;
pub use medication::{CounselingResponse, Prescription, PrescriptionInput, TreatmentPlan, TreatmentPlanInput};
pub use patient::{Patient, PatientInput};
pub use telemedicine::{SessionInput, TelemedicineSession};
pub use user::{LoginRequest, LoginResponse, PasswordChange, ProfileUpdate, RegisterInput, User};
