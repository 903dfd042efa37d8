use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "kubeglance",
    version,
    about = "A read-only terminal dashboard for Kubernetes cluster snapshots."
)]
pub struct CliArgs {
    /// Snapshot file: a kubeglance snapshot (YAML/JSON) or a `kubectl get -o yaml` List dump
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// How often to check the snapshot file for changes, in milliseconds
    #[arg(long)]
    pub refresh_ms: Option<u64>,

    /// Interface language (en, zh)
    #[arg(long)]
    pub locale: Option<String>,

    /// View to open first (overview, nodes, workloads, volcano, npu, storage, network)
    #[arg(long)]
    pub view: Option<String>,

    /// Print one view as plain text and exit instead of starting the dashboard
    #[arg(long, value_name = "VIEW")]
    pub print: Option<String>,

    /// tracing filter (for example: info,debug,trace)
    #[arg(long, default_value = "info")]
    pub log_filter: String,

    /// Write logs to this file; logs are discarded otherwise
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;

    #[test]
    fn parses_print_mode_flags() {
        let args = CliArgs::parse_from([
            "kubeglance",
            "--snapshot",
            "dump.yaml",
            "--print",
            "workloads",
            "--locale",
            "zh",
        ]);
        assert_eq!(args.print.as_deref(), Some("workloads"));
        assert_eq!(args.locale.as_deref(), Some("zh"));
        assert_eq!(args.log_filter, "info");
        assert!(args.refresh_ms.is_none());
    }
}
