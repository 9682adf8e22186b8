//! Sale coordinator against a real (in-memory) database and against
//! fault-injecting stores.

mod common;

use std::sync::Arc;

use bizdesk_backoffice::services::SALE_FAILED_MESSAGE;
use bizdesk_backoffice::{
    NextView, Notification, Notifications, SaleCoordinator, SaleOutcome, SaleWriteMode,
};
use bizdesk_core::{LowStockWarning, Product};
use tokio::task::JoinSet;

use common::{
    database, file_database, product, sale_count, sale_draft, stock_of, Fault, FaultyStore,
    StaleReadStore,
};

// =============================================================================
// Two-step (default)
// =============================================================================

#[tokio::test]
async fn test_sell_five_of_twelve_warns() {
    let db = database().await;
    let widget = product(&db, "Widget", 12).await;
    let notifications = Notifications::new();
    let mut events = notifications.subscribe();
    let coordinator = SaleCoordinator::new(db.clone(), notifications);

    let outcome = coordinator.record_sale(&sale_draft(&widget, 5)).await;

    let SaleOutcome::Recorded {
        sale,
        low_stock_warning,
    } = &outcome
    else {
        panic!("expected Recorded, got {:?}", outcome);
    };
    assert_eq!(sale.total_value_cents, 5 * 450);
    assert_eq!(
        low_stock_warning.as_ref(),
        Some(&LowStockWarning {
            product_id: widget.id.clone(),
            product_name: "Widget".to_string(),
            remaining: 7,
        })
    );
    assert_eq!(outcome.next_view(), Some(NextView::SalesList));

    assert_eq!(stock_of(&db, &widget.id).await, 7);
    let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
    assert_eq!(stored.total_value_cents, 2250);

    assert!(matches!(
        events.try_recv().unwrap(),
        Notification::SaleRecorded { .. }
    ));
    assert!(matches!(
        events.try_recv().unwrap(),
        Notification::LowStock(LowStockWarning { remaining: 7, .. })
    ));
}

#[tokio::test]
async fn test_insufficient_stock_writes_nothing() {
    let db = database().await;
    let widget = product(&db, "Widget", 3).await;
    let coordinator = SaleCoordinator::new(db.clone(), Notifications::new());

    let outcome = coordinator.record_sale(&sale_draft(&widget, 5)).await;

    assert_eq!(
        outcome,
        SaleOutcome::InsufficientStock {
            product_name: "Widget".to_string(),
            available: 3,
        }
    );
    assert_eq!(outcome.next_view(), None);
    assert_eq!(stock_of(&db, &widget.id).await, 3);
    assert_eq!(sale_count(&db).await, 0);
}

#[tokio::test]
async fn test_warning_fires_only_below_threshold() {
    let db = database().await;
    let coordinator = SaleCoordinator::new(db.clone(), Notifications::new());

    // 15 - 6 = 9 < 10
    let a = product(&db, "A", 15).await;
    match coordinator.record_sale(&sale_draft(&a, 6)).await {
        SaleOutcome::Recorded {
            low_stock_warning, ..
        } => assert_eq!(low_stock_warning.map(|w| w.remaining), Some(9)),
        other => panic!("expected Recorded, got {:?}", other),
    }

    // 15 - 5 = 10, not below
    let b = product(&db, "B", 15).await;
    match coordinator.record_sale(&sale_draft(&b, 5)).await {
        SaleOutcome::Recorded {
            low_stock_warning, ..
        } => assert_eq!(low_stock_warning, None),
        other => panic!("expected Recorded, got {:?}", other),
    }
    assert_eq!(stock_of(&db, &b.id).await, 10);
}

#[tokio::test]
async fn test_selling_entire_stock() {
    let db = database().await;
    let widget = product(&db, "Widget", 4).await;
    let coordinator = SaleCoordinator::new(db.clone(), Notifications::new());

    let outcome = coordinator.record_sale(&sale_draft(&widget, 4)).await;

    assert!(outcome.is_recorded());
    assert_eq!(stock_of(&db, &widget.id).await, 0);
}

#[tokio::test]
async fn test_configured_threshold() {
    let db = database().await;
    let widget = product(&db, "Widget", 30).await;
    let coordinator = SaleCoordinator::new(db.clone(), Notifications::new()).with_threshold(25);

    match coordinator.record_sale(&sale_draft(&widget, 6)).await {
        SaleOutcome::Recorded {
            low_stock_warning, ..
        } => assert_eq!(low_stock_warning.map(|w| w.remaining), Some(24)),
        other => panic!("expected Recorded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_product_fails() {
    let db = database().await;
    let widget = product(&db, "Widget", 5).await;
    let coordinator = SaleCoordinator::new(db.clone(), Notifications::new());

    let mut draft = sale_draft(&widget, 1);
    draft.product_id = uuid::Uuid::new_v4().to_string();

    assert_eq!(
        coordinator.record_sale(&draft).await,
        SaleOutcome::Failed {
            reason: SALE_FAILED_MESSAGE.to_string()
        }
    );
    assert_eq!(sale_count(&db).await, 0);
}

// =============================================================================
// Store failures
// =============================================================================

async fn faulty(fault: Fault, stock: i64) -> (SaleCoordinator<FaultyStore>, Product) {
    let db = database().await;
    let widget = product(&db, "Widget", stock).await;
    let coordinator = SaleCoordinator::new(FaultyStore { db, fault }, Notifications::new());
    (coordinator, widget)
}

#[tokio::test]
async fn test_product_read_failure() {
    let (coordinator, widget) = faulty(Fault::ProductRead, 10).await;

    let outcome = coordinator.record_sale(&sale_draft(&widget, 1)).await;

    assert!(matches!(outcome, SaleOutcome::Failed { .. }));
    assert_eq!(sale_count(&coordinator.store().db).await, 0);
}

#[tokio::test]
async fn test_insert_failure_leaves_stock() {
    let (coordinator, widget) = faulty(Fault::InsertSale, 10).await;

    let outcome = coordinator.record_sale(&sale_draft(&widget, 2)).await;

    assert_eq!(outcome.message(), SALE_FAILED_MESSAGE);
    assert_eq!(stock_of(&coordinator.store().db, &widget.id).await, 10);
}

#[tokio::test]
async fn test_stock_update_failure_after_insert() {
    let db = database().await;
    let widget = product(&db, "Widget", 10).await;
    let notifications = Notifications::new();
    let mut events = notifications.subscribe();
    let coordinator = SaleCoordinator::new(
        FaultyStore {
            db: db.clone(),
            fault: Fault::SetStock,
        },
        notifications,
    );

    let outcome = coordinator.record_sale(&sale_draft(&widget, 2)).await;

    // The sale row exists but stock was not decremented.
    assert!(matches!(outcome, SaleOutcome::Failed { .. }));
    assert_eq!(sale_count(&db).await, 1);
    assert_eq!(stock_of(&db, &widget.id).await, 10);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_atomic_store_failure() {
    let (coordinator, widget) = faulty(Fault::AtomicWrite, 10).await;
    let coordinator = coordinator.with_mode(SaleWriteMode::Atomic);

    let outcome = coordinator.record_sale(&sale_draft(&widget, 2)).await;

    assert!(matches!(outcome, SaleOutcome::Failed { .. }));
    assert_eq!(sale_count(&coordinator.store().db).await, 0);
}

#[tokio::test]
async fn test_two_step_stale_reads_lose_an_update() {
    let db = database().await;
    let widget = product(&db, "Widget", 5).await;
    let coordinator = SaleCoordinator::new(
        StaleReadStore {
            db: db.clone(),
            snapshot: widget.clone(),
        },
        Notifications::new(),
    );

    // Both sales pass the check against the same stock of 5.
    assert!(coordinator.record_sale(&sale_draft(&widget, 3)).await.is_recorded());
    assert!(coordinator.record_sale(&sale_draft(&widget, 3)).await.is_recorded());

    assert_eq!(sale_count(&db).await, 2);
    assert_eq!(stock_of(&db, &widget.id).await, 2);
}

// =============================================================================
// Atomic mode
// =============================================================================

#[tokio::test]
async fn test_atomic_same_outcomes() {
    let db = database().await;
    let widget = product(&db, "Widget", 12).await;
    let coordinator =
        SaleCoordinator::new(db.clone(), Notifications::new()).with_mode(SaleWriteMode::Atomic);

    match coordinator.record_sale(&sale_draft(&widget, 5)).await {
        SaleOutcome::Recorded {
            low_stock_warning, ..
        } => assert_eq!(low_stock_warning.map(|w| w.remaining), Some(7)),
        other => panic!("expected Recorded, got {:?}", other),
    }
    assert_eq!(stock_of(&db, &widget.id).await, 7);

    let outcome = coordinator.record_sale(&sale_draft(&widget, 8)).await;
    assert_eq!(
        outcome,
        SaleOutcome::InsufficientStock {
            product_name: "Widget".to_string(),
            available: 7,
        }
    );
    assert_eq!(stock_of(&db, &widget.id).await, 7);
    assert_eq!(sale_count(&db).await, 1);
}

#[tokio::test]
async fn test_atomic_ignores_stale_reads() {
    let db = database().await;
    let widget = product(&db, "Widget", 5).await;
    let coordinator = SaleCoordinator::new(
        StaleReadStore {
            db: db.clone(),
            snapshot: widget.clone(),
        },
        Notifications::new(),
    )
    .with_mode(SaleWriteMode::Atomic);

    assert!(coordinator.record_sale(&sale_draft(&widget, 3)).await.is_recorded());
    assert_eq!(
        coordinator.record_sale(&sale_draft(&widget, 3)).await,
        SaleOutcome::InsufficientStock {
            product_name: "Widget".to_string(),
            available: 2,
        }
    );
    assert_eq!(sale_count(&db).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_atomic_concurrent_sales_cannot_oversell() {
    let file = file_database(4).await;
    let db = file.db.clone();
    let widget = product(&db, "Widget", 5).await;
    let coordinator = Arc::new(
        SaleCoordinator::new(db.clone(), Notifications::new()).with_mode(SaleWriteMode::Atomic),
    );

    let mut tasks = JoinSet::new();
    for _ in 0..12 {
        let coordinator = Arc::clone(&coordinator);
        let draft = sale_draft(&widget, 1);
        tasks.spawn(async move { coordinator.record_sale(&draft).await });
    }

    let mut recorded = 0;
    let mut refused = 0;
    while let Some(outcome) = tasks.join_next().await {
        match outcome.unwrap() {
            SaleOutcome::Recorded { .. } => recorded += 1,
            SaleOutcome::InsufficientStock { available, .. } => {
                assert_eq!(available, 0);
                refused += 1;
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    assert_eq!((recorded, refused), (5, 7));
    assert_eq!(stock_of(&db, &widget.id).await, 0);
    assert_eq!(sale_count(&db).await, 5);
    db.close().await;
}
