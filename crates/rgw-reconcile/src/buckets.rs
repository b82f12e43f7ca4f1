//! Buckets data source

use async_trait::async_trait;
use rgw_admin::{AdminApi, CallContext};
use std::sync::Arc;

use crate::error::{ReconcileError, Result};
use crate::resource::DataSource;
use crate::state::{BucketEntry, BucketsState};

/// Lists every bucket on the gateway together with its owner
#[derive(Clone)]
pub struct Buckets {
    client: Arc<dyn AdminApi>,
}

impl Buckets {
    pub fn new(client: Arc<dyn AdminApi>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for Buckets {
    type State = BucketsState;

    fn type_name(&self) -> &'static str {
        "radosgw_buckets"
    }

    async fn read(&self, ctx: &CallContext) -> Result<BucketsState> {
        let stats = self
            .client
            .list_buckets(ctx)
            .await
            .map_err(|e| ReconcileError::api("list", "buckets", "", e))?;

        Ok(BucketsState {
            buckets: stats.into_iter().map(BucketEntry::from).collect(),
        })
    }
}
