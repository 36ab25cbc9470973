use super::{CollectionSpec, DomainSpec};
use rolegate_core::ServerId;
use serde_json::{Value, json};

pub(super) fn domain() -> DomainSpec {
    DomainSpec {
        server: ServerId::Crm,
        summary_tool: "crm_summary",
        collections: vec![
            CollectionSpec {
                name: "customers",
                entity: "customer",
                id_field: "customer_id",
                id_prefix: "CUST",
                required: &[
                    "company_name",
                    "contact_person",
                    "email_address",
                    "phone_number",
                    "industry",
                    "company_size",
                    "annual_revenue",
                    "lead_source",
                ],
                filters: &["status", "industry", "lead_source"],
                updatable: &["status", "last_contact_date", "notes"],
                references: &[],
                status: Some(("status", "prospect")),
                description: "Customer profiles",
            },
            CollectionSpec {
                name: "interactions",
                entity: "interaction",
                id_field: "interaction_id",
                id_prefix: "INT",
                required: &[
                    "customer_id",
                    "interaction_type",
                    "subject",
                    "description",
                    "outcome",
                    "next_action",
                ],
                filters: &["customer_id", "interaction_type", "outcome"],
                updatable: &[],
                references: &[("customer_id", "customers")],
                status: None,
                description: "Customer interaction history",
            },
            CollectionSpec {
                name: "opportunities",
                entity: "opportunity",
                id_field: "opportunity_id",
                id_prefix: "OPP",
                required: &[
                    "customer_id",
                    "opportunity_name",
                    "description",
                    "value",
                    "probability",
                    "stage",
                    "expected_close_date",
                    "assigned_to",
                    "lead_source",
                ],
                filters: &["customer_id", "stage", "assigned_to"],
                updatable: &["stage", "probability", "value", "notes"],
                references: &[("customer_id", "customers")],
                status: Some(("stage", "prospecting")),
                description: "Sales opportunities",
            },
        ],
        seed,
    }
}

fn seed() -> Vec<(&'static str, Value)> {
    vec![
        (
            "customers",
            json!({
                "customer_id": "CUST-001",
                "company_name": "TechCorp Solutions",
                "contact_person": "John Smith",
                "email_address": "john.smith@techcorp.com",
                "phone_number": "+1-555-0123",
                "industry": "Technology",
                "company_size": "100-500 employees",
                "annual_revenue": 5000000.0,
                "lead_source": "Website",
                "status": "active",
                "last_contact_date": "2024-01-20",
                "notes": "Interested in enterprise software solutions"
            }),
        ),
        (
            "customers",
            json!({
                "customer_id": "CUST-002",
                "company_name": "Global Manufacturing Inc",
                "contact_person": "Sarah Johnson",
                "email_address": "sarah.johnson@gmi.com",
                "phone_number": "+1-555-0456",
                "industry": "Manufacturing",
                "company_size": "500-1000 employees",
                "annual_revenue": 25000000.0,
                "lead_source": "Trade Show",
                "status": "prospect",
                "last_contact_date": "2024-01-25",
                "notes": "Looking for automation solutions"
            }),
        ),
        (
            "customers",
            json!({
                "customer_id": "CUST-003",
                "company_name": "StartupXYZ",
                "contact_person": "Mike Chen",
                "email_address": "mike.chen@startupxyz.com",
                "phone_number": "+1-555-0789",
                "industry": "SaaS",
                "company_size": "10-50 employees",
                "annual_revenue": 500000.0,
                "lead_source": "Referral",
                "status": "active",
                "last_contact_date": "2024-01-28",
                "notes": "Growing rapidly, needs scalable solutions"
            }),
        ),
        (
            "interactions",
            json!({
                "interaction_id": "INT-001",
                "customer_id": "CUST-001",
                "interaction_type": "demo",
                "subject": "Platform demo",
                "description": "Walked through the enterprise tier",
                "outcome": "positive",
                "next_action": "Send proposal",
                "interaction_date": "2024-01-20",
                "created_by": "alice"
            }),
        ),
        (
            "interactions",
            json!({
                "interaction_id": "INT-002",
                "customer_id": "CUST-002",
                "interaction_type": "call",
                "subject": "Discovery call",
                "description": "Discussed automation needs on the factory floor",
                "outcome": "follow_up",
                "next_action": "Schedule site visit",
                "interaction_date": "2024-01-25",
                "created_by": "alice"
            }),
        ),
        (
            "opportunities",
            json!({
                "opportunity_id": "OPP-001",
                "customer_id": "CUST-001",
                "opportunity_name": "Enterprise license",
                "description": "Three-year enterprise agreement",
                "value": 250000.0,
                "probability": 60.0,
                "stage": "proposal",
                "expected_close_date": "2024-03-31",
                "assigned_to": "alice",
                "lead_source": "Website"
            }),
        ),
    ]
}
