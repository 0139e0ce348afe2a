//! Demo organization loaded at startup

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::board::Board;
use crate::project::{Project, ProjectStatus};
use crate::task::{Task, TaskStatus};
use crate::user::{Role, User};
use crate::{Error, Priority, Result};

/// Password shared by every demo account
pub const DEMO_PASSWORD: &str = "password123";

/// Fixed identifiers of the demo records
pub mod ids {
    use uuid::Uuid;

    pub const ADMIN: Uuid = Uuid::from_u128(0x0000_0001_0000_4000_8000_0000_0000_0001);
    pub const MANAGER: Uuid = Uuid::from_u128(0x0000_0001_0000_4000_8000_0000_0000_0002);
    pub const DEVELOPER: Uuid = Uuid::from_u128(0x0000_0001_0000_4000_8000_0000_0000_0003);
    pub const DESIGNER: Uuid = Uuid::from_u128(0x0000_0001_0000_4000_8000_0000_0000_0004);

    pub const ECOMMERCE: Uuid = Uuid::from_u128(0x0000_0002_0000_4000_8000_0000_0000_0001);
    pub const MOBILE_APP: Uuid = Uuid::from_u128(0x0000_0002_0000_4000_8000_0000_0000_0002);
    pub const DB_MIGRATION: Uuid = Uuid::from_u128(0x0000_0002_0000_4000_8000_0000_0000_0003);

    pub const DESIGN_SYSTEM_TASK: Uuid = Uuid::from_u128(0x0000_0003_0000_4000_8000_0000_0000_0001);
    pub const API_TASK: Uuid = Uuid::from_u128(0x0000_0003_0000_4000_8000_0000_0000_0002);
    pub const AUTH_TASK: Uuid = Uuid::from_u128(0x0000_0003_0000_4000_8000_0000_0000_0003);
}

const AVATAR_ADMIN: &str = "https://images.pexels.com/photos/774909/pexels-photo-774909.jpeg?auto=compress&cs=tinysrgb&w=150&h=150&fit=crop";
const AVATAR_MANAGER: &str = "https://images.pexels.com/photos/1222271/pexels-photo-1222271.jpeg?auto=compress&cs=tinysrgb&w=150&h=150&fit=crop";
const AVATAR_DEVELOPER: &str = "https://images.pexels.com/photos/1239291/pexels-photo-1239291.jpeg?auto=compress&cs=tinysrgb&w=150&h=150&fit=crop";
const AVATAR_DESIGNER: &str = "https://images.pexels.com/photos/1181519/pexels-photo-1181519.jpeg?auto=compress&cs=tinysrgb&w=150&h=150&fit=crop";

/// Counts of the records a seed run inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub projects: usize,
    pub tasks: usize,
}

/// Load the demo users, projects and tasks into an empty board
pub async fn seed_demo(board: &Board) -> Result<SeedSummary> {
    let users = demo_users()?;
    let projects = demo_projects()?;
    let tasks = demo_tasks()?;
    let summary = SeedSummary {
        users: users.len(),
        projects: projects.len(),
        tasks: tasks.len(),
    };

    for user in users {
        board.users().insert(user).await?;
    }
    for project in projects {
        board.projects().insert(project).await?;
    }
    for task in tasks {
        board.tasks().create(task).await?;
    }

    tracing::info!(
        users = summary.users,
        projects = summary.projects,
        tasks = summary.tasks,
        "seeded demo data"
    );
    Ok(summary)
}

fn demo_users() -> Result<Vec<User>> {
    let now = Utc::now();
    Ok(vec![
        User::new("admin@company.com", "Admin User", Role::Admin)
            .with_id(ids::ADMIN)
            .with_avatar(AVATAR_ADMIN)
            .with_department("IT")
            .with_created_at(at(2024, 1, 1)?)
            .with_last_active(now)
            .with_password(DEMO_PASSWORD),
        User::new("pm@company.com", "Project Manager", Role::ProjectManager)
            .with_id(ids::MANAGER)
            .with_avatar(AVATAR_MANAGER)
            .with_department("Development")
            .with_created_at(at(2024, 1, 2)?)
            .with_last_active(now)
            .with_password(DEMO_PASSWORD),
        User::new("developer@company.com", "Team Member", Role::TeamMember)
            .with_id(ids::DEVELOPER)
            .with_avatar(AVATAR_DEVELOPER)
            .with_department("Development")
            .with_created_at(at(2024, 1, 3)?)
            .with_last_active(now)
            .with_password(DEMO_PASSWORD),
        User::new("designer@company.com", "UI Designer", Role::TeamMember)
            .with_id(ids::DESIGNER)
            .with_avatar(AVATAR_DESIGNER)
            .with_department("Design")
            .with_created_at(at(2024, 1, 4)?)
            .with_last_active(at(2024, 1, 18)?)
            .with_password(DEMO_PASSWORD),
    ])
}

fn demo_projects() -> Result<Vec<Project>> {
    Ok(vec![
        Project::new(
            "E-commerce Platform Redesign",
            "Complete redesign of the company e-commerce platform with modern UI/UX",
            ids::MANAGER,
            day(2024, 1, 15)?,
            day(2024, 4, 30)?,
        )
        .with_id(ids::ECOMMERCE)
        .with_status(ProjectStatus::InProgress)
        .with_priority(Priority::High)
        .with_team_members([ids::MANAGER, ids::DEVELOPER])
        .with_progress(65)
        .with_budget(50_000)
        .with_timestamps(at(2024, 1, 15)?, at(2024, 1, 20)?),
        Project::new(
            "Mobile App Development",
            "Development of companion mobile app for iOS and Android",
            ids::MANAGER,
            day(2024, 2, 1)?,
            day(2024, 6, 30)?,
        )
        .with_id(ids::MOBILE_APP)
        .with_status(ProjectStatus::Planning)
        .with_priority(Priority::Medium)
        .with_team_members([ids::DEVELOPER])
        .with_progress(25)
        .with_budget(75_000)
        .with_timestamps(at(2024, 1, 20)?, at(2024, 1, 22)?),
        Project::new(
            "Database Migration",
            "Migration from legacy database to modern cloud solution",
            ids::MANAGER,
            day(2023, 12, 1)?,
            day(2024, 1, 15)?,
        )
        .with_id(ids::DB_MIGRATION)
        .with_status(ProjectStatus::Completed)
        .with_priority(Priority::Urgent)
        .with_team_members([ids::MANAGER, ids::DEVELOPER])
        .with_progress(100)
        .with_budget(25_000)
        .with_timestamps(at(2023, 12, 1)?, at(2024, 1, 15)?),
    ])
}

fn demo_tasks() -> Result<Vec<Task>> {
    Ok(vec![
        Task::new(
            "Design System Implementation",
            "Create and implement consistent design system across all components",
            ids::ECOMMERCE,
            ids::DEVELOPER,
            day(2024, 2, 15)?,
        )
        .with_id(ids::DESIGN_SYSTEM_TASK)
        .with_status(TaskStatus::InProgress)
        .with_priority(Priority::High)
        .with_hours(40.0, 28.0)
        .with_timestamps(at(2024, 1, 15)?, at(2024, 1, 20)?),
        Task::new(
            "API Integration",
            "Integrate third-party payment and shipping APIs",
            ids::ECOMMERCE,
            ids::DEVELOPER,
            day(2024, 2, 10)?,
        )
        .with_id(ids::API_TASK)
        .with_status(TaskStatus::Completed)
        .with_priority(Priority::Medium)
        .with_hours(24.0, 26.0)
        .with_timestamps(at(2024, 1, 16)?, at(2024, 2, 10)?),
        Task::new(
            "User Authentication Setup",
            "Set up secure user authentication system",
            ids::MOBILE_APP,
            ids::DEVELOPER,
            day(2024, 2, 20)?,
        )
        .with_id(ids::AUTH_TASK)
        .with_status(TaskStatus::Todo)
        .with_priority(Priority::High)
        .with_hours(16.0, 0.0)
        .with_timestamps(at(2024, 1, 20)?, at(2024, 1, 20)?),
    ])
}

fn day(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::InvalidInput(format!("invalid date {year}-{month}-{day}")))
}

fn at(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| Error::InvalidInput(format!("invalid date {year}-{month}-{day}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_demo() {
        let board = Board::in_memory();
        let summary = seed_demo(&board).await.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                users: 4,
                projects: 3,
                tasks: 3
            }
        );

        let titles: Vec<_> = board
            .projects()
            .list()
            .await
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Database Migration",
                "E-commerce Platform Redesign",
                "Mobile App Development"
            ]
        );
    }

    #[tokio::test]
    async fn test_demo_accounts_can_sign_in() {
        let board = Board::in_memory();
        seed_demo(&board).await.unwrap();

        for email in [
            "admin@company.com",
            "pm@company.com",
            "developer@company.com",
            "designer@company.com",
        ] {
            let user = board.users().authenticate(email, DEMO_PASSWORD).await.unwrap();
            assert_eq!(user.email, email);
        }
    }

    #[tokio::test]
    async fn test_seeding_twice_conflicts() {
        let board = Board::in_memory();
        seed_demo(&board).await.unwrap();
        assert!(matches!(seed_demo(&board).await, Err(Error::Conflict(_))));
    }
}
