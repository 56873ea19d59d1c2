use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::models::{DailySignups, DashboardStats, ModelUsage, User, UserStats, UserStatus};

/// Window used for "active" users and signup growth
pub const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Aggregate the admin dashboard from raw rows
pub fn aggregate(
    now: DateTime<Utc>,
    users: &[User],
    stats: &[UserStats],
    model_counts: HashMap<String, u64>,
) -> DashboardStats {
    let window_start = now - Duration::days(ACTIVITY_WINDOW_DAYS);

    let active_users = users
        .iter()
        .filter(|u| u.status == UserStatus::Active)
        .filter(|u| u.last_login.is_some_and(|at| at > window_start))
        .count() as u64;

    let today = now.date_naive();
    let user_growth = (0..ACTIVITY_WINDOW_DAYS)
        .rev()
        .map(|back| today - Duration::days(back))
        .map(|date| DailySignups {
            date,
            day: date.format("%a").to_string(),
            count: users
                .iter()
                .filter(|u| u.created_at.date_naive() == date)
                .count() as u64,
        })
        .collect();

    let total_time: u64 = stats.iter().map(|s| s.total_usage_time).sum();
    let total_sessions: u64 = stats.iter().map(|s| s.session_count).sum();
    let average_session_time = if total_sessions > 0 {
        format!("{:.1}", total_time as f64 / total_sessions as f64)
    } else {
        "0.0".to_string()
    };

    let mut model_usage: Vec<ModelUsage> = model_counts
        .into_iter()
        .map(|(model, count)| ModelUsage { model, count })
        .collect();
    model_usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.model.cmp(&b.model)));

    DashboardStats {
        total_users: users.len() as u64,
        active_users,
        user_growth,
        average_session_time,
        model_usage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use chrono::{NaiveDate, TimeZone};

    fn user(created_at: DateTime<Utc>, last_login: Option<DateTime<Utc>>) -> User {
        let mut user = NewUser::new("a@example.com", "A").into_user(created_at);
        user.last_login = last_login;
        user
    }

    fn stats(sessions: u64, minutes: u64) -> UserStats {
        let mut stats = UserStats::zeroed("u");
        stats.session_count = sessions;
        stats.total_usage_time = minutes;
        stats
    }

    #[test]
    fn test_empty_dashboard() {
        let dashboard = aggregate(Utc::now(), &[], &[], HashMap::new());
        assert_eq!(dashboard.total_users, 0);
        assert_eq!(dashboard.active_users, 0);
        assert_eq!(dashboard.user_growth.len(), ACTIVITY_WINDOW_DAYS as usize);
        assert!(dashboard.user_growth.iter().all(|d| d.count == 0));
        assert_eq!(dashboard.average_session_time, "0.0");
        assert!(dashboard.model_usage.is_empty());
    }

    #[test]
    fn test_active_users_require_recent_login_and_active_status() {
        // Friday
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let long_ago = now - Duration::days(60);

        let recent = user(long_ago, Some(now - Duration::days(1)));
        let stale = user(long_ago, Some(now - Duration::days(8)));
        let never = user(long_ago, None);
        let mut inactive = user(long_ago, Some(now - Duration::hours(2)));
        inactive.status = UserStatus::Inactive;

        let dashboard = aggregate(now, &[recent, stale, never, inactive], &[], HashMap::new());
        assert_eq!(dashboard.total_users, 4);
        assert_eq!(dashboard.active_users, 1);
    }

    #[test]
    fn test_growth_is_daily_oldest_first() {
        // Friday
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let users = vec![
            user(now - Duration::hours(1), None),
            user(now - Duration::hours(3), None),
            user(now - Duration::days(1), None),
            // Same weekday a week back stays out of today's bucket
            user(now - Duration::days(7), None),
            user(now - Duration::days(30), None),
        ];

        let dashboard = aggregate(now, &users, &[], HashMap::new());
        let days: Vec<&str> = dashboard.user_growth.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, vec!["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"]);

        let counts: Vec<u64> = dashboard.user_growth.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(
            dashboard.user_growth[6].date,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_average_session_time_one_decimal() {
        let dashboard = aggregate(
            Utc::now(),
            &[],
            &[stats(2, 10), stats(1, 0)],
            HashMap::new(),
        );
        assert_eq!(dashboard.average_session_time, "3.3");
    }

    #[test]
    fn test_model_usage_descending() {
        let counts = HashMap::from([
            ("gpt".to_string(), 3),
            ("claude".to_string(), 7),
            ("gemini".to_string(), 1),
        ]);
        let dashboard = aggregate(Utc::now(), &[], &[], counts);
        let order: Vec<&str> = dashboard.model_usage.iter().map(|m| m.model.as_str()).collect();
        assert_eq!(order, vec!["claude", "gpt", "gemini"]);
    }
}
