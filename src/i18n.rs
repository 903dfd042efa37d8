use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en_us" | "english" => Some(Self::En),
            "zh" | "zh-cn" | "zh_cn" | "cn" | "chinese" => Some(Self::Zh),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::En => Self::Zh,
            Self::Zh => Self::En,
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Zh => write!(f, "zh"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn t(&self, key: &str) -> String {
        self.lookup(key).to_string()
    }

    pub fn tf(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut out = self.lookup(key).to_string();
        for (name, value) in params {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }

    fn lookup<'a>(&self, key: &'a str) -> &'a str {
        let catalog = match self.locale {
            Locale::En => EN,
            Locale::Zh => ZH,
        };
        find(catalog, key)
            .or_else(|| find(EN, key))
            .unwrap_or(key)
    }
}

fn find(catalog: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    catalog
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, message)| *message)
}

const EN: &[(&str, &str)] = &[
    ("app.title", "kubeglance"),
    ("view.overview", "Overview"),
    ("view.nodes", "Nodes"),
    ("view.workloads", "Workloads"),
    ("view.volcano", "Volcano Jobs"),
    ("view.npu", "NPU Topology"),
    ("view.storage", "Storage"),
    ("view.network", "Network"),
    ("common.no_data", "No data"),
    ("common.none", "none"),
    ("common.yes", "Yes"),
    ("common.no", "No"),
    ("scroll.trailer", "[Lines {from}-{to} of {total}]"),
    ("section.jobs", "Jobs ({count})"),
    ("section.services", "Services ({count})"),
    ("section.deployments", "Deployments ({count})"),
    ("section.statefulsets", "StatefulSets ({count})"),
    ("section.daemonsets", "DaemonSets ({count})"),
    ("section.cronjobs", "CronJobs ({count})"),
    ("section.nodes", "Nodes ({count})"),
    ("section.volcano_jobs", "Volcano Jobs ({count})"),
    ("section.pvs", "Persistent Volumes ({count})"),
    ("section.pvcs", "Persistent Volume Claims ({count})"),
    ("section.problem_pods", "Problem Pods ({count})"),
    ("section.pods", "Pods ({count})"),
    ("section.pods_phase", "{phase} ({count})"),
    ("section.tasks", "Tasks ({count})"),
    ("section.node_traffic", "Node Traffic ({count})"),
    ("section.unassigned_npu", "NPU nodes without SuperPod ({count})"),
    ("col.name", "NAME"),
    ("col.namespace", "NAMESPACE"),
    ("col.status", "STATUS"),
    ("col.roles", "ROLES"),
    ("col.cpu", "CPU"),
    ("col.memory", "MEM"),
    ("col.pods", "PODS"),
    ("col.npu", "NPU"),
    ("col.age", "AGE"),
    ("col.ready", "READY"),
    ("col.restarts", "RESTARTS"),
    ("col.node", "NODE"),
    ("col.completions", "COMPLETIONS"),
    ("col.type", "TYPE"),
    ("col.cluster_ip", "CLUSTER-IP"),
    ("col.ports", "PORTS"),
    ("col.up_to_date", "UP-TO-DATE"),
    ("col.available", "AVAILABLE"),
    ("col.desired", "DESIRED"),
    ("col.current", "CURRENT"),
    ("col.schedule", "SCHEDULE"),
    ("col.suspend", "SUSPEND"),
    ("col.active", "ACTIVE"),
    ("col.last_schedule", "LAST"),
    ("col.queue", "QUEUE"),
    ("col.min_available", "MIN"),
    ("col.running", "RUN"),
    ("col.pending", "PEND"),
    ("col.succeeded", "DONE"),
    ("col.failed", "FAIL"),
    ("col.replicas", "REPLICAS"),
    ("col.capacity", "CAPACITY"),
    ("col.access", "ACCESS"),
    ("col.reclaim", "RECLAIM"),
    ("col.claim", "CLAIM"),
    ("col.storage_class", "CLASS"),
    ("col.volume", "VOLUME"),
    ("col.rx", "RX"),
    ("col.tx", "TX"),
    ("col.task", "TASK"),
    ("col.ip", "IP"),
    ("col.reason", "REASON"),
    ("col.allocated", "ALLOC"),
    ("col.selector", "SELECTOR"),
    ("col.version", "VERSION"),
    ("col.external_ip", "EXTERNAL-IP"),
    ("col.schedulable", "SCHEDULABLE"),
    ("col.superpod", "SUPERPOD"),
    ("col.labels", "LABELS"),
    ("col.duration", "DURATION"),
    ("overview.nodes", "Nodes      {ready}/{total} ready"),
    (
        "overview.pods",
        "Pods       {total} total  {running} running  {pending} pending  {failed} failed  {succeeded} succeeded",
    ),
    ("overview.cpu", "CPU"),
    ("overview.memory", "Memory"),
    ("overview.npu", "NPU"),
    ("overview.alerts", "Alerts     {critical} critical  {warning} warning"),
    (
        "hint.metrics_permission",
        "Metrics unavailable: check RBAC permissions for metrics.k8s.io",
    ),
    (
        "hint.metrics_tls",
        "Metrics unavailable: TLS/certificate error reaching the metrics server",
    ),
    ("hint.metrics_unknown", "Metrics unavailable: {error}"),
    (
        "network.insufficient_history",
        "Collecting throughput history ({samples}/{required} samples)",
    ),
    (
        "npu.superpod",
        "SuperPod {id}  {allocated}/{total} NPUs  {nodes} nodes",
    ),
    ("detail.not_found", "{kind} {name} is no longer in the snapshot"),
    ("detail.title", "{kind} {name}"),
    ("status.loaded", "Loaded snapshot from {source}"),
    ("status.reloaded", "Snapshot reloaded from {source}"),
    ("status.reload_failed", "Snapshot reload failed: {error}"),
    ("status.config_reloaded", "Config reloaded from {source}"),
    ("status.config_failed", "Config reload failed: {error}"),
    ("status.locale", "Locale switched to {locale}"),
    ("status.no_selection", "Nothing selected"),
    (
        "footer.hints",
        "q quit  Tab views  j/k move  Enter open  Esc back  r reload  L locale  ? help",
    ),
    ("help.title", "Help"),
    ("help.views", "Views: 1-7 or Tab / Shift+Tab / Left / Right"),
    ("help.move", "Move: j/k or arrows, PageUp/PageDown, g/Home top, G/End bottom"),
    ("help.open", "Enter opens the selected row, Esc returns to the list"),
    ("help.misc", "r reloads the snapshot, L switches language, q quits"),
];

const ZH: &[(&str, &str)] = &[
    ("view.overview", "概览"),
    ("view.nodes", "节点"),
    ("view.workloads", "工作负载"),
    ("view.volcano", "Volcano 作业"),
    ("view.npu", "NPU 拓扑"),
    ("view.storage", "存储"),
    ("view.network", "网络"),
    ("common.no_data", "暂无数据"),
    ("common.none", "无"),
    ("common.yes", "是"),
    ("common.no", "否"),
    ("scroll.trailer", "[第 {from}-{to} 行，共 {total} 行]"),
    ("section.jobs", "任务 ({count})"),
    ("section.services", "服务 ({count})"),
    ("section.deployments", "Deployment ({count})"),
    ("section.statefulsets", "StatefulSet ({count})"),
    ("section.daemonsets", "DaemonSet ({count})"),
    ("section.cronjobs", "定时任务 ({count})"),
    ("section.nodes", "节点 ({count})"),
    ("section.volcano_jobs", "Volcano 作业 ({count})"),
    ("section.pvs", "持久卷 ({count})"),
    ("section.pvcs", "持久卷声明 ({count})"),
    ("section.problem_pods", "异常 Pod ({count})"),
    ("section.pods", "Pod ({count})"),
    ("section.tasks", "子任务 ({count})"),
    ("section.node_traffic", "节点流量 ({count})"),
    ("section.unassigned_npu", "未归属超节点的 NPU 节点 ({count})"),
    ("col.name", "名称"),
    ("col.namespace", "命名空间"),
    ("col.status", "状态"),
    ("col.age", "存活"),
    ("overview.nodes", "节点       {ready}/{total} 就绪"),
    (
        "overview.pods",
        "Pod        共 {total}  运行 {running}  等待 {pending}  失败 {failed}  完成 {succeeded}",
    ),
    ("overview.cpu", "CPU"),
    ("overview.memory", "内存"),
    ("overview.npu", "NPU"),
    ("overview.alerts", "告警       严重 {critical}  警告 {warning}"),
    (
        "hint.metrics_permission",
        "指标不可用：请检查 metrics.k8s.io 的 RBAC 权限",
    ),
    ("hint.metrics_tls", "指标不可用：连接指标服务时出现 TLS/证书错误"),
    ("hint.metrics_unknown", "指标不可用：{error}"),
    (
        "network.insufficient_history",
        "正在收集流量历史（{samples}/{required} 个样本）",
    ),
    ("npu.superpod", "超节点 {id}  {allocated}/{total} NPU  {nodes} 个节点"),
    ("detail.not_found", "{kind} {name} 已不在快照中"),
    ("status.loaded", "已从 {source} 加载快照"),
    ("status.reloaded", "已从 {source} 重新加载快照"),
    ("status.reload_failed", "快照重新加载失败：{error}"),
    ("status.locale", "语言已切换为 {locale}"),
    ("status.no_selection", "未选中任何条目"),
    (
        "footer.hints",
        "q 退出  Tab 切换视图  j/k 移动  Enter 打开  Esc 返回  r 重载  L 语言  ? 帮助",
    ),
    ("help.title", "帮助"),
];

#[cfg(test)]
mod tests {
    use super::{Locale, Translator};

    #[test]
    fn substitutes_named_parameters() {
        let tr = Translator::new(Locale::En);
        assert_eq!(
            tr.tf(
                "scroll.trailer",
                &[("from", "1"), ("to", "10"), ("total", "42")]
            ),
            "[Lines 1-10 of 42]"
        );
    }

    #[test]
    fn missing_translation_falls_back_to_english_then_key() {
        let tr = Translator::new(Locale::Zh);
        assert_eq!(tr.t("col.cluster_ip"), "CLUSTER-IP");
        assert_eq!(tr.t("common.no_data"), "暂无数据");
        assert_eq!(tr.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn locale_tokens_and_toggle() {
        assert_eq!(Locale::from_token("zh-CN"), Some(Locale::Zh));
        assert_eq!(Locale::En.toggled(), Locale::Zh);
        assert_eq!(Locale::from_token("fr"), None);
    }
}
