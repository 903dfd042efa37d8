use ratatui::text::Line;

use super::{RenderContext, ViewOutput, count_title};
use crate::format::{Column, format_age, format_bytes, row_line, toned_cell};
use crate::model::{PvData, PvcData, ViewKind};
use crate::theme::Tone;

const PV_COLUMNS: [Column; 8] = [
    Column::new("col.name", 24),
    Column::new("col.capacity", 9),
    Column::new("col.access", 8),
    Column::new("col.reclaim", 8),
    Column::new("col.status", 10),
    Column::new("col.claim", 24),
    Column::new("col.storage_class", 12),
    Column::new("col.age", 6),
];

const PVC_COLUMNS: [Column; 8] = [
    Column::new("col.name", 24),
    Column::new("col.namespace", 14),
    Column::new("col.status", 10),
    Column::new("col.volume", 24),
    Column::new("col.capacity", 9),
    Column::new("col.access", 8),
    Column::new("col.storage_class", 12),
    Column::new("col.age", 6),
];

pub(super) fn lines(ctx: &RenderContext<'_>) -> ViewOutput {
    let title = ctx.tr.t(ViewKind::Storage.title_key());
    if ctx.snapshot.pvs.is_empty() && ctx.snapshot.pvcs.is_empty() {
        return ViewOutput::no_data(ctx, title);
    }

    let mut pvs = ctx.snapshot.pvs.iter().collect::<Vec<_>>();
    pvs.sort_by(|a, b| a.name.cmp(&b.name));
    let mut pvcs = ctx.snapshot.pvcs.iter().collect::<Vec<_>>();
    pvcs.sort_by(|a, b| {
        a.namespace
            .cmp(&b.namespace)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut out = ViewOutput::titled(title);
    out.lines.push(Line::default());
    let rows = pvs.iter().map(|pv| pv_row(ctx, pv)).collect();
    out.push_section(
        ctx,
        "pvs",
        count_title(ctx, "section.pvs", pvs.len()),
        &PV_COLUMNS,
        rows,
    );
    let rows = pvcs.iter().map(|pvc| pvc_row(ctx, pvc)).collect();
    out.push_section(
        ctx,
        "pvcs",
        count_title(ctx, "section.pvcs", pvcs.len()),
        &PVC_COLUMNS,
        rows,
    );
    out
}

pub(super) fn access_modes(modes: &[String]) -> String {
    if modes.is_empty() {
        return "-".to_string();
    }
    modes
        .iter()
        .map(|mode| match mode.as_str() {
            "ReadWriteOnce" => "RWO",
            "ReadOnlyMany" => "ROX",
            "ReadWriteMany" => "RWX",
            "ReadWriteOncePod" => "RWOP",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn capacity(bytes: u64) -> (String, Tone) {
    if bytes == 0 {
        ("-".to_string(), Tone::Muted)
    } else {
        (format_bytes(bytes), Tone::Plain)
    }
}

fn pv_row(ctx: &RenderContext<'_>, pv: &PvData) -> Line<'static> {
    let (size, size_tone) = capacity(pv.capacity_bytes);
    let claim = pv
        .claim
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    row_line(
        vec![
            toned_cell(&pv.name, PV_COLUMNS[0].width, Tone::Plain),
            toned_cell(size, PV_COLUMNS[1].width, size_tone),
            toned_cell(access_modes(&pv.access_modes), PV_COLUMNS[2].width, Tone::Plain),
            toned_cell(&pv.reclaim_policy, PV_COLUMNS[3].width, Tone::Muted),
            toned_cell(pv.phase.label(), PV_COLUMNS[4].width, pv.phase.tone()),
            toned_cell(claim, PV_COLUMNS[5].width, Tone::Plain),
            toned_cell(
                pv.storage_class.as_deref().unwrap_or("-"),
                PV_COLUMNS[6].width,
                Tone::Info,
            ),
            toned_cell(format_age(ctx.now, pv.created), PV_COLUMNS[7].width, Tone::Muted),
        ],
        false,
    )
}

fn pvc_row(ctx: &RenderContext<'_>, pvc: &PvcData) -> Line<'static> {
    let (size, size_tone) = capacity(pvc.capacity_bytes);
    row_line(
        vec![
            toned_cell(&pvc.name, PVC_COLUMNS[0].width, Tone::Plain),
            toned_cell(&pvc.namespace, PVC_COLUMNS[1].width, Tone::Muted),
            toned_cell(pvc.phase.label(), PVC_COLUMNS[2].width, pvc.phase.tone()),
            toned_cell(
                pvc.volume.as_deref().unwrap_or("-"),
                PVC_COLUMNS[3].width,
                Tone::Plain,
            ),
            toned_cell(size, PVC_COLUMNS[4].width, size_tone),
            toned_cell(access_modes(&pvc.access_modes), PVC_COLUMNS[5].width, Tone::Plain),
            toned_cell(
                pvc.storage_class.as_deref().unwrap_or("-"),
                PVC_COLUMNS[6].width,
                Tone::Info,
            ),
            toned_cell(format_age(ctx.now, pvc.created), PVC_COLUMNS[7].width, Tone::Muted),
        ],
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::{access_modes, lines};
    use crate::views::fixtures::{context, english, plain, sample_snapshot};

    #[test]
    fn access_modes_use_short_names() {
        let modes = ["ReadWriteOnce".to_string(), "ReadWriteOncePod".to_string()];
        assert_eq!(access_modes(&modes), "RWO,RWOP");
        assert_eq!(access_modes(&[]), "-");
    }

    #[test]
    fn pvs_then_pvcs() {
        let mut snapshot = sample_snapshot();
        snapshot.pvcs.clear();
        let tr = english();
        let text = plain(&lines(&context(&snapshot, &tr)).lines);
        assert_eq!(text[2], "Persistent Volumes (1)");
        let pv = &text[4];
        assert!(pv.starts_with("  pv-data"));
        assert!(pv.contains("100Gi"));
        assert!(pv.contains("ml/data"));
        assert_eq!(text[6], "Persistent Volume Claims (0)");
        assert_eq!(text[8].trim(), "No data");
    }
}
