use std::future::Future;
use uuid::Uuid;

use crate::domain::{
    common::entities::app_errors::CoreError,
    identity::Identity,
    symptom_log::{
        entities::SymptomLog,
        value_objects::{CreateSymptomLogInput, GetSymptomLogsFilter, UpdateSymptomLogInput},
    },
};

/// Repository trait for symptom logs
#[cfg_attr(test, mockall::automock)]
pub trait SymptomLogRepository: Send + Sync {
    fn create_log(
        &self,
        log: SymptomLog,
    ) -> impl Future<Output = Result<SymptomLog, CoreError>> + Send;

    fn get_by_id(
        &self,
        log_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<SymptomLog>, CoreError>> + Send;

    fn get_by_user(
        &self,
        user_id: Uuid,
        filter: GetSymptomLogsFilter,
    ) -> impl Future<Output = Result<Vec<SymptomLog>, CoreError>> + Send;

    fn update_log(
        &self,
        log: SymptomLog,
    ) -> impl Future<Output = Result<SymptomLog, CoreError>> + Send;

    fn delete_log(
        &self,
        log_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

pub trait SymptomLogService: Send + Sync {
    fn create_symptom_log(
        &self,
        identity: Identity,
        input: CreateSymptomLogInput,
    ) -> impl Future<Output = Result<SymptomLog, CoreError>> + Send;

    fn get_symptom_log(
        &self,
        identity: Identity,
        log_id: Uuid,
    ) -> impl Future<Output = Result<SymptomLog, CoreError>> + Send;

    fn list_symptom_logs(
        &self,
        identity: Identity,
        filter: GetSymptomLogsFilter,
    ) -> impl Future<Output = Result<Vec<SymptomLog>, CoreError>> + Send;

    fn update_symptom_log(
        &self,
        identity: Identity,
        log_id: Uuid,
        input: UpdateSymptomLogInput,
    ) -> impl Future<Output = Result<SymptomLog, CoreError>> + Send;

    fn delete_symptom_log(
        &self,
        identity: Identity,
        log_id: Uuid,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}
