//! Closed catalogue of parse-tree node kinds.
//!
//! Every node in a parse tree is a single-key JSON object: the key is one of
//! the tags below, the value is the node's field record. The catalogue covers
//! the raw (pre-analysis) PostgreSQL 15 parse tree. Field records are not
//! checked against a schema here; anything beyond "is this a node" is left to
//! the code that reads a particular field.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{AstError, Result};

macro_rules! node_kinds {
    ($($variant:ident => $tag:literal,)+) => {
        /// A parse-tree node kind. Adding or removing a variant is a schema change.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $($variant,)+
        }

        impl NodeKind {
            /// Every registered kind, in catalogue order.
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$variant,)+];

            /// The tag this kind is written under in a parse tree.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(NodeKind::$variant => $tag,)+
                }
            }
        }
    };
}

node_kinds! {
    // Statement wrapper
    RawStmt => "RawStmt",

    // Statements
    InsertStmt => "InsertStmt",
    DeleteStmt => "DeleteStmt",
    UpdateStmt => "UpdateStmt",
    MergeStmt => "MergeStmt",
    SelectStmt => "SelectStmt",
    ReturnStmt => "ReturnStmt",
    PlAssignStmt => "PLAssignStmt",
    SetOperationStmt => "SetOperationStmt",
    CreateSchemaStmt => "CreateSchemaStmt",
    AlterTableStmt => "AlterTableStmt",
    ReplicaIdentityStmt => "ReplicaIdentityStmt",
    AlterCollationStmt => "AlterCollationStmt",
    AlterDomainStmt => "AlterDomainStmt",
    GrantStmt => "GrantStmt",
    GrantRoleStmt => "GrantRoleStmt",
    AlterDefaultPrivilegesStmt => "AlterDefaultPrivilegesStmt",
    CopyStmt => "CopyStmt",
    VariableSetStmt => "VariableSetStmt",
    VariableShowStmt => "VariableShowStmt",
    CreateStmt => "CreateStmt",
    CreateTableSpaceStmt => "CreateTableSpaceStmt",
    DropTableSpaceStmt => "DropTableSpaceStmt",
    AlterTableSpaceOptionsStmt => "AlterTableSpaceOptionsStmt",
    AlterTableMoveAllStmt => "AlterTableMoveAllStmt",
    CreateExtensionStmt => "CreateExtensionStmt",
    AlterExtensionStmt => "AlterExtensionStmt",
    AlterExtensionContentsStmt => "AlterExtensionContentsStmt",
    CreateFdwStmt => "CreateFdwStmt",
    AlterFdwStmt => "AlterFdwStmt",
    CreateForeignServerStmt => "CreateForeignServerStmt",
    AlterForeignServerStmt => "AlterForeignServerStmt",
    CreateForeignTableStmt => "CreateForeignTableStmt",
    CreateUserMappingStmt => "CreateUserMappingStmt",
    AlterUserMappingStmt => "AlterUserMappingStmt",
    DropUserMappingStmt => "DropUserMappingStmt",
    ImportForeignSchemaStmt => "ImportForeignSchemaStmt",
    CreatePolicyStmt => "CreatePolicyStmt",
    AlterPolicyStmt => "AlterPolicyStmt",
    CreateAmStmt => "CreateAmStmt",
    CreateTrigStmt => "CreateTrigStmt",
    CreateEventTrigStmt => "CreateEventTrigStmt",
    AlterEventTrigStmt => "AlterEventTrigStmt",
    CreatePLangStmt => "CreatePLangStmt",
    CreateRoleStmt => "CreateRoleStmt",
    AlterRoleStmt => "AlterRoleStmt",
    AlterRoleSetStmt => "AlterRoleSetStmt",
    DropRoleStmt => "DropRoleStmt",
    CreateSeqStmt => "CreateSeqStmt",
    AlterSeqStmt => "AlterSeqStmt",
    DefineStmt => "DefineStmt",
    CreateDomainStmt => "CreateDomainStmt",
    CreateOpClassStmt => "CreateOpClassStmt",
    CreateOpFamilyStmt => "CreateOpFamilyStmt",
    AlterOpFamilyStmt => "AlterOpFamilyStmt",
    DropStmt => "DropStmt",
    TruncateStmt => "TruncateStmt",
    CommentStmt => "CommentStmt",
    SecLabelStmt => "SecLabelStmt",
    DeclareCursorStmt => "DeclareCursorStmt",
    ClosePortalStmt => "ClosePortalStmt",
    FetchStmt => "FetchStmt",
    IndexStmt => "IndexStmt",
    CreateStatsStmt => "CreateStatsStmt",
    AlterStatsStmt => "AlterStatsStmt",
    CreateFunctionStmt => "CreateFunctionStmt",
    AlterFunctionStmt => "AlterFunctionStmt",
    DoStmt => "DoStmt",
    CallStmt => "CallStmt",
    RenameStmt => "RenameStmt",
    AlterObjectDependsStmt => "AlterObjectDependsStmt",
    AlterObjectSchemaStmt => "AlterObjectSchemaStmt",
    AlterOwnerStmt => "AlterOwnerStmt",
    AlterOperatorStmt => "AlterOperatorStmt",
    AlterTypeStmt => "AlterTypeStmt",
    RuleStmt => "RuleStmt",
    NotifyStmt => "NotifyStmt",
    ListenStmt => "ListenStmt",
    UnlistenStmt => "UnlistenStmt",
    TransactionStmt => "TransactionStmt",
    CompositeTypeStmt => "CompositeTypeStmt",
    CreateEnumStmt => "CreateEnumStmt",
    CreateRangeStmt => "CreateRangeStmt",
    AlterEnumStmt => "AlterEnumStmt",
    ViewStmt => "ViewStmt",
    LoadStmt => "LoadStmt",
    CreatedbStmt => "CreatedbStmt",
    AlterDatabaseStmt => "AlterDatabaseStmt",
    AlterDatabaseRefreshCollStmt => "AlterDatabaseRefreshCollStmt",
    AlterDatabaseSetStmt => "AlterDatabaseSetStmt",
    DropdbStmt => "DropdbStmt",
    AlterSystemStmt => "AlterSystemStmt",
    ClusterStmt => "ClusterStmt",
    VacuumStmt => "VacuumStmt",
    ExplainStmt => "ExplainStmt",
    CreateTableAsStmt => "CreateTableAsStmt",
    RefreshMatViewStmt => "RefreshMatViewStmt",
    CheckPointStmt => "CheckPointStmt",
    DiscardStmt => "DiscardStmt",
    LockStmt => "LockStmt",
    ConstraintsSetStmt => "ConstraintsSetStmt",
    ReindexStmt => "ReindexStmt",
    CreateConversionStmt => "CreateConversionStmt",
    CreateCastStmt => "CreateCastStmt",
    CreateTransformStmt => "CreateTransformStmt",
    PrepareStmt => "PrepareStmt",
    ExecuteStmt => "ExecuteStmt",
    DeallocateStmt => "DeallocateStmt",
    DropOwnedStmt => "DropOwnedStmt",
    ReassignOwnedStmt => "ReassignOwnedStmt",
    AlterTsDictionaryStmt => "AlterTSDictionaryStmt",
    AlterTsConfigurationStmt => "AlterTSConfigurationStmt",
    CreatePublicationStmt => "CreatePublicationStmt",
    AlterPublicationStmt => "AlterPublicationStmt",
    CreateSubscriptionStmt => "CreateSubscriptionStmt",
    AlterSubscriptionStmt => "AlterSubscriptionStmt",
    DropSubscriptionStmt => "DropSubscriptionStmt",

    // Expressions
    TypeName => "TypeName",
    ColumnRef => "ColumnRef",
    ParamRef => "ParamRef",
    AExpr => "A_Expr",
    AConst => "A_Const",
    TypeCast => "TypeCast",
    CollateClause => "CollateClause",
    RoleSpec => "RoleSpec",
    FuncCall => "FuncCall",
    AStar => "A_Star",
    AIndices => "A_Indices",
    AIndirection => "A_Indirection",
    AArrayExpr => "A_ArrayExpr",
    ResTarget => "ResTarget",
    MultiAssignRef => "MultiAssignRef",
    BoolExpr => "BoolExpr",
    SubLink => "SubLink",
    CaseExpr => "CaseExpr",
    CaseWhen => "CaseWhen",
    CoalesceExpr => "CoalesceExpr",
    MinMaxExpr => "MinMaxExpr",
    RowExpr => "RowExpr",
    NullTest => "NullTest",
    BooleanTest => "BooleanTest",
    SqlValueFunction => "SQLValueFunction",
    XmlExpr => "XmlExpr",
    XmlSerialize => "XmlSerialize",
    GroupingFunc => "GroupingFunc",
    SetToDefault => "SetToDefault",
    CurrentOfExpr => "CurrentOfExpr",
    FuncExpr => "FuncExpr",
    Var => "Var",
    Param => "Param",

    // Clauses and ranges
    SortBy => "SortBy",
    WindowDef => "WindowDef",
    RangeSubselect => "RangeSubselect",
    RangeFunction => "RangeFunction",
    RangeTableFunc => "RangeTableFunc",
    RangeTableFuncCol => "RangeTableFuncCol",
    RangeTableSample => "RangeTableSample",
    JoinExpr => "JoinExpr",
    FromExpr => "FromExpr",
    ColumnDef => "ColumnDef",
    TableLikeClause => "TableLikeClause",
    IndexElem => "IndexElem",
    StatsElem => "StatsElem",
    DefElem => "DefElem",
    LockingClause => "LockingClause",
    PartitionElem => "PartitionElem",
    PartitionSpec => "PartitionSpec",
    PartitionBoundSpec => "PartitionBoundSpec",
    PartitionRangeDatum => "PartitionRangeDatum",
    PartitionCmd => "PartitionCmd",
    RangeTblEntry => "RangeTblEntry",
    RangeTblFunction => "RangeTblFunction",
    TableSampleClause => "TableSampleClause",
    WithCheckOption => "WithCheckOption",
    SortGroupClause => "SortGroupClause",
    GroupingSet => "GroupingSet",
    WindowClause => "WindowClause",
    RowMarkClause => "RowMarkClause",
    WithClause => "WithClause",
    InferClause => "InferClause",
    OnConflictClause => "OnConflictClause",
    CteSearchClause => "CTESearchClause",
    CteCycleClause => "CTECycleClause",
    CommonTableExpr => "CommonTableExpr",
    MergeWhenClause => "MergeWhenClause",
    TriggerTransition => "TriggerTransition",
    AlterTableCmd => "AlterTableCmd",
    ObjectWithArgs => "ObjectWithArgs",
    AccessPriv => "AccessPriv",
    Constraint => "Constraint",
    CreateOpClassItem => "CreateOpClassItem",
    FunctionParameter => "FunctionParameter",
    InlineCodeBlock => "InlineCodeBlock",
    CallContext => "CallContext",
    VacuumRelation => "VacuumRelation",
    PublicationObjSpec => "PublicationObjSpec",
    PublicationTable => "PublicationTable",
    Alias => "Alias",
    RangeVar => "RangeVar",
    TableFunc => "TableFunc",
    IntoClause => "IntoClause",

    // Values and lists
    String => "String",
    Integer => "Integer",
    Float => "Float",
    Boolean => "Boolean",
    Null => "Null",
    BitString => "BitString",
    List => "List",
}

static BY_TAG: Lazy<HashMap<&'static str, NodeKind>> =
    Lazy::new(|| NodeKind::ALL.iter().map(|k| (k.as_str(), *k)).collect());

impl NodeKind {
    /// Look a tag up in the catalogue.
    pub fn from_tag(tag: &str) -> Option<NodeKind> {
        BY_TAG.get(tag).copied()
    }

    /// Statement kinds are the ones a raw statement may hold as its root.
    pub fn is_statement(self) -> bool {
        self != NodeKind::RawStmt && self.as_str().ends_with("Stmt")
    }
}

/// Membership test for the node-kind catalogue.
pub fn is_node_type(tag: &str) -> bool {
    BY_TAG.contains_key(tag)
}

/// Identify the kind of a tagged node.
///
/// Fails unless `value` is an object with exactly one key and that key is a
/// registered kind.
pub fn node_kind(value: &Value) -> Result<NodeKind> {
    let fields = value
        .as_object()
        .ok_or_else(|| AstError::InvalidNode(format!("expected a tagged object, got {}", value)))?;
    if fields.len() != 1 {
        return Err(AstError::InvalidNode(format!(
            "a node has exactly one tag key, found {}",
            fields.len()
        )));
    }
    let tag = fields.keys().next().map(String::as_str).unwrap_or_default();
    NodeKind::from_tag(tag)
        .ok_or_else(|| AstError::InvalidNode(format!("unknown node kind {tag:?}")))
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = AstError;

    fn from_str(s: &str) -> Result<Self> {
        NodeKind::from_tag(s)
            .ok_or_else(|| AstError::InvalidNode(format!("unknown node kind {s:?}")))
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tag = std::string::String::deserialize(deserializer)?;
        NodeKind::from_tag(&tag)
            .ok_or_else(|| de::Error::custom(format!("unknown node kind {tag:?}")))
    }
}
