use std::time::Duration;

use marketbrief::session::resolve;
use marketbrief::{FlagStore, SessionResolver, SessionState};
use tempfile::TempDir;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(1);

fn scratch_flags() -> (TempDir, FlagStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let flags = FlagStore::new(dir.path().join("flags.json")).expect("flag store");
    (dir, flags)
}

#[test]
fn onboarding_gate_wins_over_auth_flag() {
    let (_dir, flags) = scratch_flags();

    // An authenticated flag left over from a previous install must not skip
    // the first-run flow.
    flags.set_authenticated(true).unwrap();
    assert_eq!(resolve(&flags), SessionState::Onboarding);

    flags.set_onboarding_complete().unwrap();
    assert_eq!(resolve(&flags), SessionState::MainApp);
}

#[test]
fn onboarded_but_unauthenticated_requires_auth() {
    let (_dir, flags) = scratch_flags();
    flags.set_onboarding_complete().unwrap();
    assert_eq!(resolve(&flags), SessionState::AuthRequired);

    flags.set_authenticated(false).unwrap();
    assert_eq!(resolve(&flags), SessionState::AuthRequired);
}

#[tokio::test]
async fn resolver_reports_onboarding_on_first_run() {
    let (_dir, flags) = scratch_flags();
    let resolver = SessionResolver::spawn(flags);

    let mut rx = resolver.subscribe();
    timeout(WAIT, rx.wait_for(|state| *state == SessionState::Onboarding))
        .await
        .expect("resolver never left Loading")
        .unwrap();

    resolver.shutdown().await;
}

#[tokio::test]
async fn resolver_follows_login_without_polling_delay() {
    let (_dir, flags) = scratch_flags();
    flags.set_onboarding_complete().unwrap();

    let resolver = SessionResolver::spawn(flags.clone());
    let mut rx = resolver.subscribe();

    timeout(WAIT, rx.wait_for(|state| *state == SessionState::AuthRequired))
        .await
        .expect("resolver never reached AuthRequired")
        .unwrap();

    flags.set_authenticated(true).unwrap();
    timeout(WAIT, rx.wait_for(|state| *state == SessionState::MainApp))
        .await
        .expect("resolver never reached MainApp")
        .unwrap();

    resolver.shutdown().await;
}

#[tokio::test]
async fn main_app_regresses_only_when_onboarding_is_cleared() {
    let (_dir, flags) = scratch_flags();
    flags.set_onboarding_complete().unwrap();
    flags.set_authenticated(true).unwrap();

    let resolver = SessionResolver::spawn(flags.clone());
    let mut rx = resolver.subscribe();
    timeout(WAIT, rx.wait_for(|state| *state == SessionState::MainApp))
        .await
        .expect("resolver never reached MainApp")
        .unwrap();

    // Unrelated flag writes leave the surface alone.
    flags
        .set_membership(marketbrief::models::Membership::Pro)
        .unwrap();
    assert_eq!(resolver.current(), SessionState::MainApp);

    // The debug "view onboarding" affordance clears the flag to force the
    // transition back.
    flags.reset_onboarding().unwrap();
    timeout(WAIT, rx.wait_for(|state| *state == SessionState::Onboarding))
        .await
        .expect("resolver never regressed to Onboarding")
        .unwrap();

    resolver.shutdown().await;
}

#[tokio::test]
async fn shutdown_detaches_the_resolver_from_flag_writes() {
    let (_dir, flags) = scratch_flags();
    let resolver = SessionResolver::spawn(flags.clone());

    let mut rx = resolver.subscribe();
    timeout(WAIT, rx.wait_for(|state| *state == SessionState::Onboarding))
        .await
        .expect("resolver never left Loading")
        .unwrap();

    resolver.shutdown().await;

    // Flag writes after teardown no longer move the state.
    flags.set_onboarding_complete().unwrap();
    flags.set_authenticated(true).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(resolver.current(), SessionState::Onboarding);
}
