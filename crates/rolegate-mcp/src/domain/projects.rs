use super::{CollectionSpec, DomainSpec};
use rolegate_core::ServerId;
use serde_json::{Value, json};

pub(super) fn domain() -> DomainSpec {
    DomainSpec {
        server: ServerId::ProjectManagement,
        summary_tool: "project_summary",
        collections: vec![
            CollectionSpec {
                name: "tasks",
                entity: "task",
                id_field: "task_id",
                id_prefix: "TASK",
                required: &[
                    "project_id",
                    "task_name",
                    "description",
                    "assigned_to",
                    "assignee_name",
                    "due_date",
                ],
                filters: &["project_id", "assigned_to", "state", "priority"],
                updatable: &["state", "actual_hours", "progress_percentage", "notes"],
                references: &[],
                status: Some(("state", "todo")),
                description: "Project tasks",
            },
            CollectionSpec {
                name: "milestones",
                entity: "milestone",
                id_field: "milestone_id",
                id_prefix: "MIL",
                required: &["project_id", "milestone_name", "target_date"],
                filters: &["project_id", "status"],
                updatable: &["status", "achieved_date", "notes"],
                references: &[],
                status: Some(("status", "pending")),
                description: "Project milestones",
            },
            CollectionSpec {
                name: "team_members",
                entity: "team_member",
                id_field: "member_id",
                id_prefix: "DEV",
                required: &["name", "role", "email"],
                filters: &["role"],
                updatable: &["availability_hours"],
                references: &[],
                status: None,
                description: "Team members",
            },
        ],
        seed,
    }
}

fn seed() -> Vec<(&'static str, Value)> {
    vec![
        (
            "tasks",
            json!({
                "task_id": "TASK-001",
                "project_id": "PROJ-001",
                "task_name": "Database Schema Design",
                "description": "Design and implement the core database schema for the e-commerce platform",
                "assigned_to": "DEV-001",
                "assignee_name": "Sarah Johnson",
                "priority": "high",
                "state": "completed",
                "estimated_hours": 16.0,
                "actual_hours": 14.5,
                "due_date": "2024-01-20",
                "progress_percentage": 100.0,
                "notes": "Completed ahead of schedule"
            }),
        ),
        (
            "tasks",
            json!({
                "task_id": "TASK-002",
                "project_id": "PROJ-001",
                "task_name": "User Authentication API",
                "description": "Implement token-based authentication with role-based access control",
                "assigned_to": "DEV-002",
                "assignee_name": "Mike Chen",
                "priority": "critical",
                "state": "in_progress",
                "estimated_hours": 24.0,
                "actual_hours": 18.0,
                "due_date": "2024-01-30",
                "progress_percentage": 75.0,
                "notes": "Core functionality complete, working on edge cases"
            }),
        ),
        (
            "tasks",
            json!({
                "task_id": "TASK-003",
                "project_id": "PROJ-002",
                "task_name": "Frontend Dashboard Design",
                "description": "Create responsive dashboard UI",
                "assigned_to": "DEV-003",
                "assignee_name": "Emily Rodriguez",
                "priority": "medium",
                "state": "todo",
                "estimated_hours": 20.0,
                "actual_hours": 0.0,
                "due_date": "2024-02-15",
                "progress_percentage": 0.0,
                "notes": "Waiting for design mockups"
            }),
        ),
        (
            "milestones",
            json!({
                "milestone_id": "MIL-001",
                "project_id": "PROJ-001",
                "milestone_name": "Backend MVP",
                "target_date": "2024-02-01",
                "achieved_date": null,
                "status": "pending",
                "notes": ""
            }),
        ),
        (
            "team_members",
            json!({
                "member_id": "DEV-001",
                "name": "Sarah Johnson",
                "role": "Backend Developer",
                "email": "sarah.johnson@company.com",
                "availability_hours": 40.0
            }),
        ),
        (
            "team_members",
            json!({
                "member_id": "DEV-002",
                "name": "Mike Chen",
                "role": "Security Engineer",
                "email": "mike.chen@company.com",
                "availability_hours": 32.0
            }),
        ),
        (
            "team_members",
            json!({
                "member_id": "DEV-003",
                "name": "Emily Rodriguez",
                "role": "Frontend Developer",
                "email": "emily.rodriguez@company.com",
                "availability_hours": 40.0
            }),
        ),
    ]
}
