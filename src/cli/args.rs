//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--output` / `-o`: Output format (json, table, yaml)
//! - `--yes` / `-y`: Skip confirmation prompts
//! - `--agent`: Agent mode (JSON envelope, no prompts)
//! - `--debug`: Enable debug logging

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::ui::output::OutputFormat;

/// Pup - Datadog API CLI
#[derive(Parser, Debug)]
#[command(name = "pup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (json, table, yaml)
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Skip confirmation prompts (auto-approve all operations)
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Enable agent mode (auto-detected for AI coding assistants)
    #[arg(long, global = true)]
    pub agent: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    // ========== Utility ==========
    /// Manage stored credentials
    #[command(
        name = "auth",
        long_about = "Manage the bearer token pup uses to call the Datadog API.\n\n\
            `login` runs an OAuth2 authorization code flow with PKCE in the browser. \
            Tokens are kept per site in the configured secret store, refreshed when \
            they near expiry, and used whenever DD_ACCESS_TOKEN is not set. Endpoints \
            that do not accept bearer tokens still need DD_API_KEY and DD_APP_KEY.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Log in through the browser for the current site
    pup auth login

    # Log in on a machine without a browser (open the printed URL elsewhere)
    pup auth login --no-browser

    # Store an existing token instead (prompts without echo)
    pup auth login --token

    # Check which credentials will be used
    pup auth status

    # Print the stored token for use in scripts
    pup auth token

    # Forget the stored token
    pup auth logout"
    )]
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Create shortcuts for pup commands
    #[command(
        name = "alias",
        after_help = "\
WORKFLOW EXAMPLES:
    # Create a shortcut for a frequently used command
    pup alias set prod-monitors \"monitors list --tags=env:production\"

    # Use it; extra arguments are appended
    pup prod-monitors --limit=10

    # List and remove aliases
    pup alias list
    pup alias delete prod-monitors"
    )]
    Alias {
        #[command(subcommand)]
        action: AliasAction,
    },

    /// Tools for AI coding assistants
    #[command(name = "agent")]
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },

    /// Print version information
    #[command(name = "version")]
    Version,

    /// Check configuration and connectivity
    #[command(name = "test")]
    Test,

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    // ========== Resources ==========
    /// Manage monitors
    #[command(
        name = "monitors",
        after_help = "\
WORKFLOW EXAMPLES:
    # Monitors for one environment
    pup monitors list --tags=env:production

    # Full-text search, then inspect one result
    pup monitors search --query=\"status:Alert\"
    pup monitors get 12345"
    )]
    Monitors {
        #[command(subcommand)]
        action: MonitorAction,
    },

    /// Manage dashboards
    #[command(name = "dashboards")]
    Dashboards {
        #[command(subcommand)]
        action: DashboardAction,
    },

    /// Manage monitor downtimes
    #[command(name = "downtime")]
    Downtime {
        #[command(subcommand)]
        action: DowntimeAction,
    },

    /// Query events
    #[command(name = "events")]
    Events {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Manage notebooks
    #[command(name = "notebooks")]
    Notebooks {
        #[command(subcommand)]
        action: NotebookAction,
    },

    /// Manage service level objectives
    #[command(
        name = "slos",
        after_help = "\
WORKFLOW EXAMPLES:
    # Current status of an SLO over the last 30 days
    pup slos status abc123 --from=30d"
    )]
    Slos {
        #[command(subcommand)]
        action: SloAction,
    },

    /// Manage case management cases and projects
    #[command(name = "cases")]
    Cases {
        #[command(subcommand)]
        action: CaseAction,
    },

    /// Query CI Visibility pipelines and tests
    #[command(name = "cicd")]
    Cicd {
        #[command(subcommand)]
        action: CicdAction,
    },

    /// Inspect cloud provider integrations
    #[command(name = "cloud")]
    Cloud {
        #[command(subcommand)]
        action: CloudAction,
    },

    /// Manage on-call teams and memberships
    #[command(name = "on-call")]
    OnCall {
        #[command(subcommand)]
        action: OnCallAction,
    },

    /// Real User Monitoring
    #[command(name = "rum")]
    Rum {
        #[command(subcommand)]
        action: RumAction,
    },

    /// Security monitoring rules, signals and findings
    #[command(name = "security")]
    Security {
        #[command(subcommand)]
        action: SecurityAction,
    },

    /// Status pages and third-party outages
    #[command(
        name = "status-pages",
        after_help = "\
WORKFLOW EXAMPLES:
    # Is a vendor having an outage right now?
    pup status-pages third-party --search=github --active"
    )]
    StatusPages {
        #[command(subcommand)]
        action: StatusPageAction,
    },

    /// Synthetic tests and locations
    #[command(name = "synthetics")]
    Synthetics {
        #[command(subcommand)]
        action: SyntheticsAction,
    },

    /// Manage API keys
    #[command(name = "api-keys")]
    ApiKeys {
        #[command(subcommand)]
        action: ApiKeyAction,
    },

    /// Error tracking issues
    #[command(name = "error-tracking")]
    ErrorTracking {
        #[command(subcommand)]
        action: ErrorTrackingAction,
    },

    /// Service scorecards
    #[command(name = "scorecards")]
    Scorecards {
        #[command(subcommand)]
        action: ScorecardAction,
    },

    /// Observability pipelines
    #[command(name = "obs-pipelines")]
    ObsPipelines {
        #[command(subcommand)]
        action: ObsPipelineAction,
    },
}

// ========== Utility actions ==========

/// Auth subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AuthAction {
    /// Log in through the browser (OAuth2 with PKCE), or store a token
    Login {
        /// Store this bearer token instead of logging in; prompts when given without a value
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        token: Option<String>,
        /// Print the authorization URL instead of opening a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Remove stored tokens and the registered OAuth client for the current site
    Logout,
    /// Show which credentials are configured and when the token expires
    Status,
    /// Print the current access token, refreshing it if needed
    Token,
    /// Refresh the stored OAuth token now
    Refresh,
}

/// Alias subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AliasAction {
    /// List your aliases
    List,
    /// Create a shortcut for a pup command
    Set {
        /// Alias name
        name: String,
        /// Command the alias expands to
        command: String,
    },
    /// Delete aliases
    Delete {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Import aliases from a TOML file
    Import {
        #[arg(long)]
        file: PathBuf,
    },
}

/// Agent subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AgentAction {
    /// Output the command schema as JSON
    Schema {
        /// Limit the schema to a subtree, e.g. `monitors` or `rum.apps`
        path: Vec<String>,
    },
}

/// Supported shells for completion
#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

// ========== Resource actions ==========

/// Monitor subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum MonitorAction {
    /// List monitors
    List {
        /// Filter by name substring
        #[arg(long)]
        name: Option<String>,
        /// Filter by monitor tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
        /// Maximum results (1-1000)
        #[arg(long, default_value_t = 200)]
        limit: u32,
    },
    /// Get monitor details
    Get { monitor_id: i64 },
    /// Search monitors
    Search {
        #[arg(long)]
        query: Option<String>,
    },
    /// Delete a monitor
    Delete { monitor_id: i64 },
}

/// Dashboard subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DashboardAction {
    /// List all dashboards
    List,
    /// Get dashboard details
    Get { dashboard_id: String },
    /// Create a dashboard from a JSON file
    Create {
        /// JSON file, or `-` for stdin
        #[arg(long)]
        file: String,
    },
    /// Replace a dashboard from a JSON file
    Update {
        dashboard_id: String,
        #[arg(long)]
        file: String,
    },
    /// Delete a dashboard
    Delete { dashboard_id: String },
}

/// Downtime subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DowntimeAction {
    /// List downtimes
    List {
        /// Only downtimes active now
        #[arg(long)]
        current_only: bool,
    },
    /// Get downtime details
    Get { downtime_id: String },
    /// Schedule a downtime from a JSON file
    Create {
        #[arg(long)]
        file: String,
    },
    /// Cancel a downtime
    Cancel { downtime_id: String },
}

/// Event subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum EventAction {
    /// List events in a time range
    List {
        #[arg(long, default_value = "1h")]
        from: String,
        #[arg(long, default_value = "now")]
        to: String,
        /// Filter by tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
    },
    /// Search events
    Search {
        #[arg(long, default_value = "*")]
        query: String,
        #[arg(long, default_value = "1h")]
        from: String,
        #[arg(long, default_value = "now")]
        to: String,
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    /// Get event details
    Get { event_id: i64 },
}

/// Notebook subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum NotebookAction {
    /// List notebooks
    List,
    /// Get notebook details
    Get { notebook_id: i64 },
    /// Create a notebook from a JSON file
    Create {
        #[arg(long)]
        file: String,
    },
    /// Replace a notebook from a JSON file
    Update {
        notebook_id: i64,
        #[arg(long)]
        file: String,
    },
    /// Delete a notebook
    Delete { notebook_id: i64 },
}

/// SLO subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SloAction {
    /// List SLOs
    List,
    /// Get SLO details
    Get { slo_id: String },
    /// Create an SLO from a JSON file
    Create {
        #[arg(long)]
        file: String,
    },
    /// Replace an SLO from a JSON file
    Update {
        slo_id: String,
        #[arg(long)]
        file: String,
    },
    /// Delete an SLO
    Delete { slo_id: String },
    /// SLO status over a time window
    Status {
        slo_id: String,
        #[arg(long, default_value = "7d")]
        from: String,
        #[arg(long, default_value = "now")]
        to: String,
    },
}

/// Case subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CaseAction {
    /// Search cases
    Search {
        #[arg(long)]
        query: Option<String>,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
    /// Get case details
    Get { case_id: String },
    /// Create a case from a JSON file
    Create {
        #[arg(long)]
        file: String,
    },
    /// Archive a case
    Archive { case_id: String },
    /// Unarchive a case
    Unarchive { case_id: String },
    /// Assign a case to a user
    Assign {
        case_id: String,
        #[arg(long)]
        user_id: String,
    },
    /// Change a case's priority
    UpdatePriority {
        case_id: String,
        #[arg(long, value_enum, ignore_case = true)]
        priority: CasePriority,
    },
    /// Change a case's status
    UpdateStatus {
        case_id: String,
        #[arg(long, value_enum, ignore_case = true)]
        status: CaseStatus,
    },
    /// Manage case projects
    Projects {
        #[command(subcommand)]
        action: CaseProjectAction,
    },
}

/// Case priority levels
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePriority {
    #[value(name = "P1")]
    P1,
    #[value(name = "P2")]
    P2,
    #[value(name = "P3")]
    P3,
    #[value(name = "P4")]
    P4,
    #[value(name = "P5")]
    P5,
    #[value(name = "NOT_DEFINED")]
    NotDefined,
}

impl CasePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            CasePriority::P1 => "P1",
            CasePriority::P2 => "P2",
            CasePriority::P3 => "P3",
            CasePriority::P4 => "P4",
            CasePriority::P5 => "P5",
            CasePriority::NotDefined => "NOT_DEFINED",
        }
    }
}

/// Case workflow states
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    #[value(name = "OPEN")]
    Open,
    #[value(name = "IN_PROGRESS")]
    InProgress,
    #[value(name = "CLOSED")]
    Closed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Open => "OPEN",
            CaseStatus::InProgress => "IN_PROGRESS",
            CaseStatus::Closed => "CLOSED",
        }
    }
}

/// Case project subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CaseProjectAction {
    /// List projects
    List,
    /// Get project details
    Get { project_id: String },
    /// Create a project
    Create {
        #[arg(long)]
        name: String,
        /// Short project key, e.g. `OPS`
        #[arg(long)]
        key: String,
    },
    /// Delete a project
    Delete { project_id: String },
}

/// CI/CD subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CicdAction {
    /// CI pipeline executions
    Pipelines {
        #[command(subcommand)]
        action: PipelineAction,
    },
    /// CI test runs
    Tests {
        #[command(subcommand)]
        action: CiTestAction,
    },
    /// Search and aggregate pipeline events
    Events {
        #[command(subcommand)]
        action: CiEventAction,
    },
    /// Flaky test management
    FlakyTests {
        #[command(subcommand)]
        action: FlakyTestAction,
    },
}

/// Time window and page size shared by event queries.
#[derive(clap::Args, Debug, Clone)]
pub struct TimeRange {
    /// Start time (1h, 30m, 7d, RFC3339, unix ms)
    #[arg(long, default_value = "1h")]
    pub from: String,
    /// End time
    #[arg(long, default_value = "now")]
    pub to: String,
    /// Maximum results
    #[arg(long, default_value_t = 50)]
    pub limit: u32,
}

/// Pipeline subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PipelineAction {
    /// List recent pipeline events
    List {
        #[arg(long)]
        query: Option<String>,
        #[command(flatten)]
        range: TimeRange,
    },
    /// Get events for one pipeline
    Get {
        pipeline_id: String,
        #[arg(long, default_value = "7d")]
        from: String,
        #[arg(long, default_value = "now")]
        to: String,
    },
}

/// CI test subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CiTestAction {
    /// List recent test events
    List {
        #[arg(long)]
        query: Option<String>,
        #[command(flatten)]
        range: TimeRange,
    },
    /// Search test events
    Search {
        #[arg(long)]
        query: String,
        #[command(flatten)]
        range: TimeRange,
    },
}

/// CI event subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CiEventAction {
    /// Search pipeline events
    Search {
        #[arg(long)]
        query: String,
        #[command(flatten)]
        range: TimeRange,
    },
    /// Aggregate pipeline events
    Aggregate {
        #[arg(long)]
        query: String,
        #[arg(long, default_value = "1h")]
        from: String,
        #[arg(long, default_value = "now")]
        to: String,
        /// Aggregation function (count, avg, sum, min, max, cardinality, pc90...)
        #[arg(long, default_value = "count")]
        compute: String,
        /// Facet to group by
        #[arg(long)]
        group_by: Option<String>,
    },
}

/// Flaky test subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FlakyTestAction {
    /// Search flaky tests
    Search {
        #[arg(long)]
        query: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
}

/// Cloud integration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CloudAction {
    /// AWS integration
    Aws {
        #[command(subcommand)]
        action: ListOnly,
    },
    /// GCP integration
    Gcp {
        #[command(subcommand)]
        action: ListOnly,
    },
    /// Azure integration
    Azure {
        #[command(subcommand)]
        action: ListOnly,
    },
    /// OCI integration
    Oci {
        #[command(subcommand)]
        action: OciAction,
    },
}

/// Resources that only support listing
#[derive(Subcommand, Debug, Clone)]
pub enum ListOnly {
    /// List configured accounts
    List,
}

/// OCI subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum OciAction {
    /// OCI tenancy configurations
    Tenancies {
        #[command(subcommand)]
        action: TenancyAction,
    },
}

/// OCI tenancy subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TenancyAction {
    /// List tenancies
    List,
    /// Get tenancy details
    Get { tenancy_id: String },
    /// Delete a tenancy configuration
    Delete { tenancy_id: String },
}

/// On-call subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum OnCallAction {
    /// Teams
    Teams {
        #[command(subcommand)]
        action: TeamAction,
    },
    /// Team memberships
    Memberships {
        #[command(subcommand)]
        action: MembershipAction,
    },
}

/// Team subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TeamAction {
    /// List teams
    List,
    /// Get team details
    Get { team_id: String },
    /// Create a team
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        handle: String,
    },
    /// Update a team
    Update {
        team_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        handle: String,
    },
    /// Delete a team
    Delete { team_id: String },
}

/// Team membership roles
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamRole {
    Member,
    Admin,
}

/// Membership subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum MembershipAction {
    /// List team members
    List {
        team_id: String,
        #[arg(long, default_value_t = 100)]
        page_size: u32,
    },
    /// Add a user to a team
    Add {
        team_id: String,
        #[arg(long)]
        user_id: String,
        #[arg(long, value_enum, default_value_t = TeamRole::Member)]
        role: TeamRole,
    },
    /// Remove a user from a team
    Remove { team_id: String, user_id: String },
}

/// RUM subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RumAction {
    /// RUM applications
    Apps {
        #[command(subcommand)]
        action: RumAppAction,
    },
    /// RUM events
    Events {
        #[command(subcommand)]
        action: RumEventAction,
    },
    /// RUM sessions
    Sessions {
        #[command(subcommand)]
        action: RumSessionAction,
    },
    /// RUM custom metrics
    Metrics {
        #[command(subcommand)]
        action: RumMetricAction,
    },
    /// RUM retention filters
    RetentionFilters {
        #[command(subcommand)]
        action: RetentionFilterAction,
    },
    /// Session replay playlists
    Playlists {
        #[command(subcommand)]
        action: PlaylistAction,
    },
    /// Session replay heatmaps
    Heatmaps {
        #[command(subcommand)]
        action: HeatmapAction,
    },
}

/// RUM application subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RumAppAction {
    /// List applications
    List,
    /// Get application details
    Get { app_id: String },
    /// Create an application
    Create {
        #[arg(long)]
        name: String,
        /// Application type (browser, ios, android, react-native, flutter...)
        #[arg(long = "type")]
        app_type: Option<String>,
    },
    /// Update an application
    Update {
        app_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        app_type: Option<String>,
    },
    /// Delete an application
    Delete { app_id: String },
}

/// RUM event subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RumEventAction {
    /// List recent RUM events
    List {
        #[arg(long)]
        query: Option<String>,
        #[command(flatten)]
        range: TimeRange,
    },
}

/// RUM session subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RumSessionAction {
    /// List recent sessions
    List {
        #[command(flatten)]
        range: TimeRange,
    },
    /// Search sessions
    Search {
        #[arg(long)]
        query: Option<String>,
        #[command(flatten)]
        range: TimeRange,
    },
}

/// RUM metric subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RumMetricAction {
    /// List custom metrics
    List,
    /// Get custom metric details
    Get { metric_id: String },
    /// Create a custom metric
    Create {
        #[arg(long)]
        file: String,
    },
    /// Update a custom metric
    Update {
        metric_id: String,
        #[arg(long)]
        file: String,
    },
    /// Delete a custom metric
    Delete { metric_id: String },
}

/// Retention filter subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RetentionFilterAction {
    /// List filters for an application
    List { app_id: String },
    /// Get filter details
    Get { app_id: String, filter_id: String },
    /// Create a filter
    Create {
        app_id: String,
        #[arg(long)]
        file: String,
    },
    /// Update a filter
    Update {
        app_id: String,
        filter_id: String,
        #[arg(long)]
        file: String,
    },
    /// Delete a filter
    Delete { app_id: String, filter_id: String },
}

/// Playlist subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistAction {
    /// List playlists
    List,
    /// Get playlist details
    Get { playlist_id: String },
}

/// Heatmap subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HeatmapAction {
    /// Query heatmap data for a view
    Query {
        #[arg(long)]
        view_name: String,
    },
}

/// Security subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SecurityAction {
    /// Detection rules
    Rules {
        #[command(subcommand)]
        action: RuleAction,
    },
    /// Security signals
    Signals {
        #[command(subcommand)]
        action: SignalAction,
    },
    /// Posture management findings
    Findings {
        #[command(subcommand)]
        action: FindingAction,
    },
    /// Content packs
    ContentPacks {
        #[command(subcommand)]
        action: ContentPackAction,
    },
    /// Entity risk scores
    RiskScores {
        #[command(subcommand)]
        action: RiskScoreAction,
    },
}

/// Rule subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RuleAction {
    /// List detection rules
    List,
    /// Get rule details
    Get { rule_id: String },
}

/// Signal subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SignalAction {
    /// Search signals
    Search {
        #[arg(long, default_value = "*")]
        query: String,
        #[command(flatten)]
        range: TimeRange,
    },
}

/// Finding subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum FindingAction {
    /// Search findings by tag filter
    Search {
        /// Tag filter, e.g. `cloud_provider:aws`
        #[arg(long)]
        query: Option<String>,
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
}

/// Content pack subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ContentPackAction {
    /// List content packs and their state
    List,
    /// Activate a content pack
    Activate { pack_id: String },
    /// Deactivate a content pack
    Deactivate { pack_id: String },
}

/// Risk score subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RiskScoreAction {
    /// List entity risk scores
    List {
        #[arg(long)]
        query: Option<String>,
    },
}

/// Status page subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum StatusPageAction {
    /// Your status pages
    Pages {
        #[command(subcommand)]
        action: PageAction,
    },
    /// Outage signals for third-party providers
    ThirdParty {
        /// Filter providers by name
        #[arg(long)]
        search: Option<String>,
        /// Only providers with an unresolved outage
        #[arg(long)]
        active: bool,
    },
}

/// Page subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PageAction {
    /// List status pages
    List,
    /// Get status page details
    Get { page_id: String },
    /// Delete a status page
    Delete { page_id: String },
}

/// Synthetics subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SyntheticsAction {
    /// Synthetic tests
    Tests {
        #[command(subcommand)]
        action: SyntheticTestAction,
    },
    /// Test locations
    Locations {
        #[command(subcommand)]
        action: ListOnly,
    },
}

/// Synthetic test subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SyntheticTestAction {
    /// List tests
    List,
    /// Get test details
    Get { public_id: String },
    /// Search tests
    Search {
        #[arg(long)]
        text: Option<String>,
        #[arg(long, default_value_t = 50)]
        count: u32,
    },
}

/// API key subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ApiKeyAction {
    /// List API keys
    List,
    /// Get API key details
    Get { key_id: String },
    /// Create an API key
    Create {
        #[arg(long)]
        name: String,
    },
    /// Delete an API key
    Delete { key_id: String },
}

/// Error tracking subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ErrorTrackingAction {
    /// Error tracking issues
    Issues {
        #[command(subcommand)]
        action: IssueAction,
    },
}

/// Issue subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum IssueAction {
    /// Search issues
    Search {
        #[arg(long)]
        query: Option<String>,
        #[command(flatten)]
        range: TimeRange,
    },
    /// Get issue details
    Get { issue_id: String },
}

/// Scorecard subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ScorecardAction {
    /// List scorecards
    List,
    /// Get scorecard details
    Get { scorecard_id: String },
}

/// Observability pipeline subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ObsPipelineAction {
    /// List pipelines
    List,
    /// Get pipeline details
    Get { pipeline_id: String },
}
