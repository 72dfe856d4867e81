mod test_helpers;

use proptest::prelude::*;
use readstreak_domain::progress::ProgressEntry;
use readstreak_domain::shared::BookId;
use test_helpers::{day, noon, Harness};

const THRESHOLD: u32 = 10;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Updating once per day in date order must end where a single rebuild
    // at the last processed day ends.
    #[test]
    fn prop_daily_updates_match_rebuild(pages in prop::collection::vec(
        prop_oneof![Just(0u32), 1u32..THRESHOLD, THRESHOLD..3 * THRESHOLD],
        1..45,
    )) {
        let rt = runtime();
        let (incremental, rebuilt) = rt.block_on(async {
            let daily = Harness::new(THRESHOLD);
            for (offset, count) in pages.iter().enumerate() {
                let date = day(offset as i64);
                daily.set_today(date);
                if *count > 0 {
                    daily
                        .service
                        .record_progress(
                            &daily.user,
                            ProgressEntry::new(BookId::new(), None, *count, noon(date)),
                        )
                        .await
                        .unwrap();
                } else {
                    daily.service.update_streaks(&daily.user).await.unwrap();
                }
            }
            let incremental = daily.service.get_streak(&daily.user).await.unwrap();

            let full = Harness::new(THRESHOLD);
            full.add_days(day(0), &pages).await;
            let last = day(pages.len() as i64 - 1);
            let rebuilt = full
                .service
                .rebuild_streak(&full.user, Some(last), false)
                .await
                .unwrap();

            (incremental, rebuilt)
        });

        prop_assert_eq!(incremental.stats(), rebuilt.stats());
        prop_assert!(incremental.current_streak() <= incremental.longest_streak());
    }

    #[test]
    fn prop_appending_qualifying_day_never_lowers_longest(
        pages in prop::collection::vec(0u32..3 * THRESHOLD, 0..30),
    ) {
        let rt = runtime();
        let (before, after) = rt.block_on(async {
            let h = Harness::new(THRESHOLD);
            h.add_days(day(0), &pages).await;
            let end = day(pages.len() as i64);

            let before = h
                .service
                .rebuild_streak(&h.user, Some(end), false)
                .await
                .unwrap();
            h.add_days(end, &[THRESHOLD]).await;
            let after = h
                .service
                .rebuild_streak(&h.user, Some(end), false)
                .await
                .unwrap();

            (before, after)
        });

        prop_assert!(after.longest_streak() >= before.longest_streak());
        prop_assert!(after.total_days_active() == before.total_days_active() + 1);
        prop_assert!(after.current_streak() >= 1);
    }
}
