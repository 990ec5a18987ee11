use accounts_domain::Transaction;

/// Per-request facts every write needs: the transaction the request runs
/// under (self links are built from its id) and a correlation id for logs.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub transaction: Transaction,
    pub request_id: String,
}

impl RequestContext {
    pub fn new(transaction: Transaction, request_id: impl Into<String>) -> Self {
        RequestContext {
            transaction,
            request_id: request_id.into(),
        }
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction.id
    }
}
