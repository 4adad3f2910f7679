use anyhow::Result;
use sea_orm::prelude::*;
use sea_orm::ActiveValue;
use shared::entity::iron_condor_trades;
use shared::{TRADE_FAILED, TRADE_FILLED};
use std::sync::Arc;

/// Row id of a recorded leg and whether this write stored a new fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedTrade {
    pub id: u64,
    pub fill_stored: bool,
}

pub struct TradeRepository {
    db: Arc<DatabaseConnection>,
}

impl TradeRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_client_order_id(&self, client_order_id: &str) -> Result<Option<iron_condor_trades::Model>> {
        let trade = iron_condor_trades::Entity::find()
            .filter(iron_condor_trades::Column::ClientOrderId.eq(client_order_id))
            .one(self.db.as_ref())
            .await?;
        Ok(trade)
    }

    /// Insert the leg, keyed by `client_order_id`.
    ///
    /// A replayed leg reuses the existing row. A row stored as failed is
    /// overwritten when the replay brings a fill; a filled row is never touched.
    pub async fn record(
        &self,
        mut active_model: iron_condor_trades::ActiveModel,
        client_order_id: &str,
    ) -> Result<RecordedTrade> {
        let filled = matches!(&active_model.status, ActiveValue::Set(status) if status == TRADE_FILLED);

        let Some(existing) = self.find_by_client_order_id(client_order_id).await? else {
            let result = iron_condor_trades::Entity::insert(active_model)
                .exec(self.db.as_ref())
                .await?;
            return Ok(RecordedTrade {
                id: result.last_insert_id,
                fill_stored: filled,
            });
        };

        if !filled || existing.status != TRADE_FAILED {
            return Ok(RecordedTrade {
                id: existing.id,
                fill_stored: false,
            });
        }

        active_model.id = ActiveValue::NotSet;
        active_model.created_at = ActiveValue::NotSet;
        // guarded on status so two concurrent replays store the fill once
        let result = iron_condor_trades::Entity::update_many()
            .set(active_model)
            .filter(iron_condor_trades::Column::Id.eq(existing.id))
            .filter(iron_condor_trades::Column::Status.eq(TRADE_FAILED))
            .exec(self.db.as_ref())
            .await?;
        Ok(RecordedTrade {
            id: existing.id,
            fill_stored: result.rows_affected == 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn row(status: &str) -> iron_condor_trades::Model {
        iron_condor_trades::Model {
            id: 31,
            user_id: 10,
            user_strategy_id: 5,
            strategy_id: 7,
            run_id: "r1".into(),
            leg_index: 2,
            client_order_id: "copy-5-r1-2".into(),
            broker_order_id: None,
            option_type: "Call".into(),
            side: "Sell".into(),
            strike: "105".into(),
            expiration: "30".into(),
            size: 1,
            fill_price: dec!(0),
            realized_profit: None,
            status: status.into(),
            error: Some("insufficient buying power".into()),
            created_at: None,
        }
    }

    fn filled_leg() -> iron_condor_trades::ActiveModel {
        iron_condor_trades::ActiveModel {
            user_id: ActiveValue::Set(10),
            user_strategy_id: ActiveValue::Set(5),
            strategy_id: ActiveValue::Set(7),
            run_id: ActiveValue::Set("r1".into()),
            leg_index: ActiveValue::Set(2),
            client_order_id: ActiveValue::Set("copy-5-r1-2".into()),
            broker_order_id: ActiveValue::Set(Some("B-2".into())),
            option_type: ActiveValue::Set("Call".into()),
            side: ActiveValue::Set("Sell".into()),
            strike: ActiveValue::Set("105".into()),
            expiration: ActiveValue::Set("30".into()),
            size: ActiveValue::Set(1),
            fill_price: ActiveValue::Set(dec!(1.40)),
            realized_profit: ActiveValue::Set(None),
            status: ActiveValue::Set(TRADE_FILLED.into()),
            error: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Some(chrono::Utc::now())),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_new_leg_is_inserted() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<iron_condor_trades::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 44,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = TradeRepository::new(Arc::new(db));
        let recorded = repo.record(filled_leg(), "copy-5-r1-2").await.unwrap();
        assert_eq!(recorded, RecordedTrade { id: 44, fill_stored: true });
    }

    #[tokio::test]
    async fn test_replayed_fill_overwrites_failed_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([vec![row(TRADE_FAILED)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let repo = TradeRepository::new(db.clone());
        let recorded = repo.record(filled_leg(), "copy-5-r1-2").await.unwrap();
        assert_eq!(recorded, RecordedTrade { id: 31, fill_stored: true });

        drop(repo);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let update = &log[1].statements()[0].sql;
        assert!(update.starts_with("UPDATE `iron_condor_trades`"), "{}", update);
        assert!(update.contains("`broker_order_id`"));
        assert!(!update.contains("`created_at`"));
    }

    #[tokio::test]
    async fn test_filled_row_is_left_alone() {
        let mut filled = row(TRADE_FILLED);
        filled.broker_order_id = Some("B-2".into());
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![filled]])
            .into_connection();
        let repo = TradeRepository::new(Arc::new(db));
        let recorded = repo.record(filled_leg(), "copy-5-r1-2").await.unwrap();
        assert_eq!(recorded, RecordedTrade { id: 31, fill_stored: false });
    }
}
