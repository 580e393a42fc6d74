use anyhow::Result;
use tryout::app::forms::AddSubscriptionForm;
use tryout::core::aggregator::{format_cost, total_monthly_cost};
use tryout::{BillingCycle, CancelOutcome, Session, SessionPhase, SimulatedProvider, TryoutError};

fn instant_session() -> Session<SimulatedProvider> {
    Session::new(SimulatedProvider::instant())
}

#[tokio::test]
async fn test_login_seeds_two_subscriptions() -> Result<()> {
    let session = instant_session();
    assert!(!session.is_logged_in().await);

    session.login("anyone@example.com").await?;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.phase, SessionPhase::LoggedIn);
    let names: Vec<&str> = snapshot.subscriptions.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Netflix", "Google One"]);
    assert_eq!(format_cost(total_monthly_cost(&snapshot.subscriptions)), "$17.98");
    Ok(())
}

#[tokio::test]
async fn test_full_session_lifecycle() -> Result<()> {
    let session = instant_session();
    session.login("anyone@example.com").await?;

    // 使用者新增一筆年繳訂閱
    let form = AddSubscriptionForm {
        name: "Annual Backup".to_string(),
        provider: "Backup Co.".to_string(),
        price: "24".to_string(),
        billing_cycle: "yearly".to_string(),
        next_billing_date: "2025-01-01".to_string(),
        ..AddSubscriptionForm::default()
    };
    let added = session.add(form.into_new_subscription()?).await?;
    assert_eq!(added.billing_cycle, BillingCycle::Yearly);
    assert_eq!(session.summary().await.formatted_cost(), "$19.98");

    // 使用者新增的訂閱無法程式取消
    assert_eq!(session.cancel(&added).await?, CancelOutcome::NotCancellable);

    let google = session
        .subscriptions()
        .await
        .into_iter()
        .find(|s| s.name == "Google One")
        .expect("seeded Google One");
    assert_eq!(session.cancel(&google).await?, CancelOutcome::Cancelled);
    assert_eq!(session.cancel(&google).await?, CancelOutcome::AlreadyRemoved);

    let names: Vec<String> = session
        .subscriptions()
        .await
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Netflix", "Annual Backup"]);

    session.logout().await?;
    assert!(session.subscriptions().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_discovery_failure_is_surfaced() {
    let session = Session::new(SimulatedProvider::instant().with_failures(true, false));

    let err = session.login("anyone@example.com").await.unwrap_err();

    assert!(matches!(err, TryoutError::DiscoveryFailed { .. }));
    assert_eq!(session.phase().await, SessionPhase::LoggedOut);
    assert!(session.subscriptions().await.is_empty());
    assert!(session.last_error().await.is_some());
}

#[tokio::test]
async fn test_cancellation_failure_keeps_subscription() -> Result<()> {
    let session = Session::new(SimulatedProvider::instant().with_failures(false, true));
    session.login("anyone@example.com").await?;
    let google = session.subscriptions().await[1].clone();

    let err = session.cancel(&google).await.unwrap_err();

    assert!(matches!(err, TryoutError::CancellationFailed { .. }));
    assert!(session.subscription(&google.id).await.is_some());
    assert_eq!(session.subscriptions().await.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_cancellations_with_real_delay() -> Result<()> {
    let provider = SimulatedProvider::instant().with_delays(
        std::time::Duration::ZERO,
        std::time::Duration::from_millis(20),
    );
    let session = Session::new(provider);
    session.login("anyone@example.com").await?;
    let google = session.subscriptions().await[1].clone();

    let (first, second) = tokio::join!(session.cancel(&google), session.cancel(&google));

    let mut outcomes = vec![first?, second?];
    outcomes.sort_by_key(|o| format!("{:?}", o));
    assert_eq!(outcomes, vec![CancelOutcome::Cancelled, CancelOutcome::InProgress]);
    assert_eq!(session.subscriptions().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_timed_out_login_can_be_retried() -> Result<()> {
    let provider = SimulatedProvider::instant().with_delays(
        std::time::Duration::from_millis(200),
        std::time::Duration::ZERO,
    );
    let session = Session::new(provider);

    let attempt = tokio::time::timeout(
        std::time::Duration::from_millis(10),
        session.login("anyone@example.com"),
    )
    .await;
    assert!(attempt.is_err());
    assert_eq!(session.phase().await, SessionPhase::LoggedOut);

    session.logout().await?;
    session.login("anyone@example.com").await?;
    assert_eq!(session.subscriptions().await.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_timed_out_cancel_can_be_retried() -> Result<()> {
    let provider = SimulatedProvider::instant().with_delays(
        std::time::Duration::ZERO,
        std::time::Duration::from_millis(200),
    );
    let session = Session::new(provider);
    session.login("anyone@example.com").await?;
    let google = session.subscriptions().await[1].clone();

    let attempt = tokio::time::timeout(
        std::time::Duration::from_millis(10),
        session.cancel(&google),
    )
    .await;
    assert!(attempt.is_err());
    assert!(session.subscription(&google.id).await.is_some());

    assert_eq!(session.cancel(&google).await?, CancelOutcome::Cancelled);
    assert!(session.subscription(&google.id).await.is_none());
    Ok(())
}
