use anyhow::Result;

use super::ApiClient;
use crate::core::model::{
    Account, AccountUpdate, BalanceResponse, Message, NewAccount, Transaction, TransferRequest,
};

impl ApiClient {
    /// Only success matters; the backend's reply is read as an acknowledgement.
    pub async fn create_account(&self, account: &NewAccount) -> Result<Message> {
        self.post_ack("/api/accounts/create-account", account).await
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.get("/api/accounts/get-accounts").await
    }

    pub async fn get_account(&self, id: &str) -> Result<Account> {
        self.get(&format!("/api/accounts/get-account/{id}")).await
    }

    pub async fn update_account(&self, id: &str, update: &AccountUpdate) -> Result<Message> {
        self.put_ack(&format!("/api/accounts/update-account/{id}"), update).await
    }

    pub async fn delete_account(&self, id: &str) -> Result<Message> {
        self.delete(&format!("/api/accounts/delete-account/{id}")).await
    }

    pub async fn account_balance(&self, id: &str) -> Result<BalanceResponse> {
        self.get(&format!("/api/accounts/get-account-balance/{id}")).await
    }

    pub async fn transfer(&self, request: &TransferRequest) -> Result<Message> {
        self.post_ack("/api/accounts/transfer", request).await
    }

    pub async fn account_transactions(&self, id: &str) -> Result<Vec<Transaction>> {
        self.get(&format!("/api/accounts/get-account-transactions/{id}")).await
    }
}
