use super::{CollectionSpec, DomainSpec};
use rolegate_core::ServerId;
use serde_json::{Value, json};

pub(super) fn domain() -> DomainSpec {
    DomainSpec {
        server: ServerId::HrManagement,
        summary_tool: "hr_summary",
        collections: vec![
            CollectionSpec {
                name: "employees",
                entity: "employee",
                id_field: "employee_id",
                id_prefix: "EMP",
                required: &[
                    "first_name",
                    "last_name",
                    "email",
                    "phone",
                    "department",
                    "position",
                    "hire_date",
                    "salary",
                    "location",
                    "emergency_contact",
                    "emergency_phone",
                ],
                filters: &["department", "employment_status", "location"],
                updatable: &["employment_status", "position", "department", "salary", "notes"],
                references: &[],
                status: Some(("employment_status", "active")),
                description: "Employee records",
            },
            CollectionSpec {
                name: "leave_requests",
                entity: "leave_request",
                id_field: "leave_id",
                id_prefix: "LEAVE",
                required: &["employee_id", "leave_type", "start_date", "end_date", "reason"],
                filters: &["employee_id", "leave_type", "status"],
                updatable: &["status", "approved_by", "notes"],
                references: &[("employee_id", "employees")],
                status: Some(("status", "pending")),
                description: "Leave requests",
            },
            CollectionSpec {
                name: "performance_reviews",
                entity: "performance_review",
                id_field: "review_id",
                id_prefix: "REV",
                required: &[
                    "employee_id",
                    "reviewer_id",
                    "review_period",
                    "overall_rating",
                ],
                filters: &["employee_id", "reviewer_id", "overall_rating"],
                updatable: &[],
                references: &[("employee_id", "employees"), ("reviewer_id", "employees")],
                status: None,
                description: "Performance reviews",
            },
        ],
        seed,
    }
}

fn seed() -> Vec<(&'static str, Value)> {
    vec![
        (
            "employees",
            json!({
                "employee_id": "EMP-001",
                "first_name": "John",
                "last_name": "Smith",
                "email": "john.smith@company.com",
                "phone": "+1-555-0101",
                "department": "Engineering",
                "position": "Senior Software Engineer",
                "hire_date": "2022-03-15",
                "salary": 85000.0,
                "employment_status": "active",
                "manager_id": "EMP-003",
                "location": "San Francisco",
                "emergency_contact": "Jane Smith",
                "emergency_phone": "+1-555-0102",
                "notes": "Excellent team player"
            }),
        ),
        (
            "employees",
            json!({
                "employee_id": "EMP-002",
                "first_name": "Sarah",
                "last_name": "Johnson",
                "email": "sarah.johnson@company.com",
                "phone": "+1-555-0201",
                "department": "Marketing",
                "position": "Marketing Manager",
                "hire_date": "2021-08-10",
                "salary": 75000.0,
                "employment_status": "active",
                "manager_id": null,
                "location": "New York",
                "emergency_contact": "Tom Johnson",
                "emergency_phone": "+1-555-0202",
                "notes": ""
            }),
        ),
        (
            "employees",
            json!({
                "employee_id": "EMP-003",
                "first_name": "Michael",
                "last_name": "Brown",
                "email": "michael.brown@company.com",
                "phone": "+1-555-0301",
                "department": "Engineering",
                "position": "Engineering Manager",
                "hire_date": "2019-05-20",
                "salary": 120000.0,
                "employment_status": "on_leave",
                "manager_id": null,
                "location": "San Francisco",
                "emergency_contact": "Lisa Brown",
                "emergency_phone": "+1-555-0302",
                "notes": "On parental leave until March"
            }),
        ),
        (
            "leave_requests",
            json!({
                "leave_id": "LEAVE-001",
                "employee_id": "EMP-003",
                "leave_type": "paternity",
                "start_date": "2024-01-08",
                "end_date": "2024-03-01",
                "reason": "Birth of child",
                "status": "approved",
                "approved_by": "EMP-002",
                "notes": ""
            }),
        ),
        (
            "leave_requests",
            json!({
                "leave_id": "LEAVE-002",
                "employee_id": "EMP-001",
                "leave_type": "annual",
                "start_date": "2024-04-15",
                "end_date": "2024-04-19",
                "reason": "Family vacation",
                "status": "pending",
                "approved_by": null,
                "notes": ""
            }),
        ),
        (
            "performance_reviews",
            json!({
                "review_id": "REV-001",
                "employee_id": "EMP-001",
                "reviewer_id": "EMP-003",
                "review_period": "2023",
                "overall_rating": "excellent",
                "comments": "Led the platform migration"
            }),
        ),
    ]
}
