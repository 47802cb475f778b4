//! Backend collections and the per-entity profiles that parameterise the
//! generic list controller.

use serde::{Deserialize, Serialize};

/// A REST collection exposed by the forms backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    LeaveTypes,
    UserLeaves,
    PurchaseRequest,
    Reimbursement,
    CreditCardAcknowledgementReceipt,
    Transmittals,
    LeaveApplication,
    CashAdvanceLiquidation,
    Users,
    ReportsAudit,
}

impl Resource {
    pub fn all() -> &'static [Resource] {
        &[
            Resource::PurchaseRequest,
            Resource::Reimbursement,
            Resource::CreditCardAcknowledgementReceipt,
            Resource::Transmittals,
            Resource::LeaveApplication,
            Resource::CashAdvanceLiquidation,
            Resource::LeaveTypes,
            Resource::UserLeaves,
            Resource::Users,
            Resource::ReportsAudit,
        ]
    }

    /// Path segment under `/api/`.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::LeaveTypes => "leave_types",
            Resource::UserLeaves => "user_leaves",
            Resource::PurchaseRequest => "purchase_request",
            Resource::Reimbursement => "reimbursement",
            Resource::CreditCardAcknowledgementReceipt => "credit_card_acknowledgement_receipt",
            Resource::Transmittals => "transmittals",
            Resource::LeaveApplication => "leave_application",
            Resource::CashAdvanceLiquidation => "cash_advance_liquidation",
            Resource::Users => "users",
            Resource::ReportsAudit => "reports_audit",
        }
    }

    pub fn title(&self) -> &'static str {
        self.profile().title
    }

    pub fn profile(&self) -> &'static EntityProfile {
        match self {
            Resource::LeaveTypes => &LEAVE_TYPES,
            Resource::UserLeaves => &USER_LEAVES,
            Resource::PurchaseRequest => &PURCHASE_REQUEST,
            Resource::Reimbursement => &REIMBURSEMENT,
            Resource::CreditCardAcknowledgementReceipt => &CREDIT_CARD_ACKNOWLEDGEMENT,
            Resource::Transmittals => &TRANSMITTALS,
            Resource::LeaveApplication => &LEAVE_APPLICATION,
            Resource::CashAdvanceLiquidation => &CASH_ADVANCE_LIQUIDATION,
            Resource::Users => &USERS,
            Resource::ReportsAudit => &REPORTS_AUDIT,
        }
    }
}

/// Table column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub header: &'static str,
    /// Relative width used by the table layout.
    pub width: u16,
}

/// Where the options of a choice field come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceSource {
    /// User directory; the stored value is the user id.
    Users,
    /// Leave-type reference list; the stored value is the type name.
    LeaveTypes,
    Fixed(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Choice(ChoiceSource),
    /// Computed from another field through the leave-type lookup; read-only.
    Derived { from: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> Self {
        Self {
            name,
            label,
            kind,
            required,
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.kind, FieldKind::Derived { .. })
    }
}

/// Restricts a listing to rows whose `field` equals `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusScope {
    pub field: &'static str,
    pub value: &'static str,
    pub label: &'static str,
}

/// Everything the generic list controller needs to know about one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityProfile {
    pub title: &'static str,
    pub id_field: &'static str,
    pub reference_field: Option<&'static str>,
    pub search_fields: &'static [&'static str],
    pub date_field: Option<&'static str>,
    /// Ascending, case-insensitive sort applied after filtering.
    pub sort_by: Option<&'static str>,
    pub columns: &'static [Column],
    pub form: &'static [FieldSpec],
    pub read_only: bool,
    pub server_date_range: bool,
    pub status_scope: Option<StatusScope>,
    pub stamps_operator: bool,
}

impl EntityProfile {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.form.iter().find(|f| f.name == name)
    }
}

const STATUS_CHOICES: ChoiceSource = ChoiceSource::Fixed(&["Pending", "Approved", "Rejected"]);

const fn col(field: &'static str, header: &'static str, width: u16) -> Column {
    Column {
        field,
        header,
        width,
    }
}

static LEAVE_TYPES: EntityProfile = EntityProfile {
    title: "Leave Types",
    id_field: "id",
    reference_field: None,
    search_fields: &["leave_type", "days", "description"],
    date_field: None,
    sort_by: None,
    columns: &[
        col("leave_type", "Leave Type", 30),
        col("days", "Days", 10),
        col("description", "Description", 60),
    ],
    form: &[
        FieldSpec::new("leave_type", "Leave Type", FieldKind::Text, true),
        FieldSpec::new("days", "Days", FieldKind::Number, true),
        FieldSpec::new("description", "Description", FieldKind::Text, false),
    ],
    read_only: false,
    server_date_range: false,
    status_scope: None,
    stamps_operator: false,
};

static USER_LEAVES: EntityProfile = EntityProfile {
    title: "Manage User Leave",
    id_field: "id",
    reference_field: None,
    search_fields: &["name", "leave_type", "leave_days"],
    date_field: None,
    sort_by: Some("name"),
    columns: &[
        col("name", "Employee", 40),
        col("leave_type", "Leave Type", 35),
        col("leave_days", "Days", 25),
    ],
    form: &[
        FieldSpec::new("user_id", "Employee", FieldKind::Choice(ChoiceSource::Users), true),
        FieldSpec::new(
            "leave_type",
            "Leave Type",
            FieldKind::Choice(ChoiceSource::LeaveTypes),
            true,
        ),
        FieldSpec::new(
            "leave_days",
            "Leave Days",
            FieldKind::Derived { from: "leave_type" },
            true,
        ),
    ],
    read_only: false,
    server_date_range: false,
    status_scope: None,
    stamps_operator: false,
};

static PURCHASE_REQUEST: EntityProfile = EntityProfile {
    title: "Purchase Requests",
    id_field: "id",
    reference_field: Some("pr_code"),
    search_fields: &["pr_code", "name", "branch", "department", "status"],
    date_field: Some("date"),
    sort_by: None,
    columns: &[
        col("pr_code", "PR Code", 15),
        col("name", "Requested By", 20),
        col("branch", "Branch", 15),
        col("department", "Department", 15),
        col("date", "Date", 15),
        col("status", "Status", 10),
        col("items", "Items", 10),
    ],
    form: &[
        FieldSpec::new("branch", "Branch", FieldKind::Text, true),
        FieldSpec::new("department", "Department", FieldKind::Text, true),
        FieldSpec::new("purpose", "Purpose", FieldKind::Text, true),
        FieldSpec::new("date", "Date", FieldKind::Date, true),
        FieldSpec::new("status", "Status", FieldKind::Choice(STATUS_CHOICES), false),
    ],
    read_only: false,
    server_date_range: false,
    status_scope: Some(StatusScope {
        field: "status",
        value: "Pending",
        label: "Pending only",
    }),
    stamps_operator: true,
};

static REIMBURSEMENT: EntityProfile = EntityProfile {
    title: "Reimbursements",
    id_field: "id",
    reference_field: Some("rb_code"),
    search_fields: &["rb_code", "name", "branch", "department", "status", "amount"],
    date_field: Some("date"),
    sort_by: None,
    columns: &[
        col("rb_code", "RB Code", 15),
        col("name", "Requested By", 20),
        col("branch", "Branch", 15),
        col("department", "Department", 15),
        col("amount", "Amount", 10),
        col("date", "Date", 15),
        col("status", "Status", 10),
    ],
    form: &[
        FieldSpec::new("branch", "Branch", FieldKind::Text, true),
        FieldSpec::new("department", "Department", FieldKind::Text, true),
        FieldSpec::new("amount", "Amount", FieldKind::Number, true),
        FieldSpec::new("date", "Date", FieldKind::Date, true),
        FieldSpec::new("remarks", "Remarks", FieldKind::Text, false),
        FieldSpec::new("status", "Status", FieldKind::Choice(STATUS_CHOICES), false),
    ],
    read_only: false,
    server_date_range: false,
    status_scope: None,
    stamps_operator: true,
};

static CREDIT_CARD_ACKNOWLEDGEMENT: EntityProfile = EntityProfile {
    title: "Credit Card Acknowledgements",
    id_field: "id",
    reference_field: Some("ccar_code"),
    search_fields: &["ccar_code", "name", "branch", "department", "status"],
    date_field: Some("date"),
    sort_by: None,
    columns: &[
        col("ccar_code", "CCAR Code", 15),
        col("name", "Cardholder", 20),
        col("branch", "Branch", 15),
        col("department", "Department", 15),
        col("date", "Date", 15),
        col("status", "Status", 10),
        col("items", "Items", 10),
    ],
    form: &[
        FieldSpec::new("branch", "Branch", FieldKind::Text, true),
        FieldSpec::new("department", "Department", FieldKind::Text, true),
        FieldSpec::new("card_name", "Card Name", FieldKind::Text, true),
        FieldSpec::new("date", "Date", FieldKind::Date, true),
        FieldSpec::new("status", "Status", FieldKind::Choice(STATUS_CHOICES), false),
    ],
    read_only: false,
    server_date_range: false,
    status_scope: None,
    stamps_operator: true,
};

static TRANSMITTALS: EntityProfile = EntityProfile {
    title: "Transmittals",
    id_field: "id",
    reference_field: Some("transmittal_code"),
    search_fields: &["transmittal_code", "name", "branch", "department", "status", "recipient"],
    date_field: Some("date"),
    sort_by: None,
    columns: &[
        col("transmittal_code", "Code", 15),
        col("name", "Prepared By", 20),
        col("recipient", "Recipient", 15),
        col("branch", "Branch", 15),
        col("date", "Date", 15),
        col("status", "Status", 10),
    ],
    form: &[
        FieldSpec::new("branch", "Branch", FieldKind::Text, true),
        FieldSpec::new("department", "Department", FieldKind::Text, true),
        FieldSpec::new("recipient", "Recipient", FieldKind::Text, true),
        FieldSpec::new("date", "Date", FieldKind::Date, true),
        FieldSpec::new("remarks", "Remarks", FieldKind::Text, false),
    ],
    read_only: false,
    server_date_range: false,
    status_scope: None,
    stamps_operator: true,
};

static LEAVE_APPLICATION: EntityProfile = EntityProfile {
    title: "Leave Applications",
    id_field: "id",
    reference_field: Some("la_code"),
    search_fields: &["la_code", "name", "leave_type", "branch", "department", "status"],
    date_field: Some("date_filed"),
    sort_by: None,
    columns: &[
        col("la_code", "LA Code", 15),
        col("name", "Employee", 20),
        col("leave_type", "Leave Type", 15),
        col("date_from", "From", 12),
        col("date_to", "To", 12),
        col("date_filed", "Filed", 12),
        col("status", "Status", 10),
    ],
    form: &[
        FieldSpec::new(
            "leave_type",
            "Leave Type",
            FieldKind::Choice(ChoiceSource::LeaveTypes),
            true,
        ),
        FieldSpec::new("date_from", "Date From", FieldKind::Date, true),
        FieldSpec::new("date_to", "Date To", FieldKind::Date, true),
        FieldSpec::new("date_filed", "Date Filed", FieldKind::Date, true),
        FieldSpec::new("reason", "Reason", FieldKind::Text, true),
    ],
    read_only: false,
    server_date_range: false,
    status_scope: None,
    stamps_operator: true,
};

static CASH_ADVANCE_LIQUIDATION: EntityProfile = EntityProfile {
    title: "Cash Advance Liquidations",
    id_field: "id",
    reference_field: Some("cal_code"),
    search_fields: &["cal_code", "name", "branch", "department", "status"],
    date_field: Some("date"),
    sort_by: None,
    columns: &[
        col("cal_code", "CAL Code", 15),
        col("name", "Requested By", 20),
        col("branch", "Branch", 15),
        col("department", "Department", 15),
        col("amount", "Amount", 10),
        col("date", "Date", 15),
        col("status", "Status", 10),
    ],
    form: &[
        FieldSpec::new("branch", "Branch", FieldKind::Text, true),
        FieldSpec::new("department", "Department", FieldKind::Text, true),
        FieldSpec::new("purpose", "Purpose", FieldKind::Text, true),
        FieldSpec::new("amount", "Amount", FieldKind::Number, true),
        FieldSpec::new("date", "Date", FieldKind::Date, true),
    ],
    read_only: false,
    server_date_range: false,
    status_scope: None,
    stamps_operator: true,
};

static USERS: EntityProfile = EntityProfile {
    title: "Users",
    id_field: "id",
    reference_field: None,
    search_fields: &["name", "email", "role", "branch", "department"],
    date_field: None,
    sort_by: None,
    columns: &[
        col("name", "Name", 25),
        col("email", "Email", 30),
        col("role", "Role", 15),
        col("branch", "Branch", 15),
        col("department", "Department", 15),
    ],
    form: &[
        FieldSpec::new("name", "Name", FieldKind::Text, true),
        FieldSpec::new("email", "Email", FieldKind::Text, true),
        FieldSpec::new(
            "role",
            "Role",
            FieldKind::Choice(ChoiceSource::Fixed(&["admin", "approver", "employee"])),
            true,
        ),
        FieldSpec::new("branch", "Branch", FieldKind::Text, false),
        FieldSpec::new("department", "Department", FieldKind::Text, false),
    ],
    read_only: false,
    server_date_range: false,
    status_scope: None,
    stamps_operator: false,
};

static REPORTS_AUDIT: EntityProfile = EntityProfile {
    title: "Audit Report",
    id_field: "id",
    reference_field: Some("reference_code"),
    search_fields: &["reference_code", "form_type", "name", "status"],
    date_field: Some("created_at"),
    sort_by: None,
    columns: &[
        col("reference_code", "Reference", 20),
        col("form_type", "Form", 20),
        col("name", "Requested By", 20),
        col("status", "Status", 15),
        col("created_at", "Created", 25),
    ],
    form: &[],
    read_only: true,
    server_date_range: true,
    status_scope: None,
    stamps_operator: false,
};
