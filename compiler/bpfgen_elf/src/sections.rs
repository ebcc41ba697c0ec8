//! Program section names.
//!
//! The compiler places each program in a section whose name encodes the
//! program type, and for some types the attach target after a `/`.

use bpfgen_ir::ProgramType;

/// Section-name prefixes, most specific first.
const PROGRAM_SECTIONS: &[(&str, ProgramType)] = &[
    ("socket", ProgramType::SocketFilter),
    ("kprobe/", ProgramType::Kprobe),
    ("kretprobe/", ProgramType::Kprobe),
    ("uprobe/", ProgramType::Kprobe),
    ("uretprobe/", ProgramType::Kprobe),
    ("tracepoint/", ProgramType::TracePoint),
    ("raw_tracepoint/", ProgramType::RawTracepoint),
    ("xdp", ProgramType::Xdp),
    ("perf_event", ProgramType::PerfEvent),
    ("classifier", ProgramType::SchedCls),
    ("action", ProgramType::SchedAct),
    ("cgroup_skb/", ProgramType::CgroupSkb),
    ("cgroup/skb", ProgramType::CgroupSkb),
    ("cgroup/dev", ProgramType::CgroupDevice),
    ("cgroup/sock", ProgramType::CgroupSock),
    ("sockops", ProgramType::SockOps),
    ("sk_skb", ProgramType::SkSkb),
    ("sk_msg", ProgramType::SkMsg),
    ("lwt_in", ProgramType::LwtIn),
    ("lwt_out", ProgramType::LwtOut),
    ("lwt_xmit", ProgramType::LwtXmit),
];

/// Program type and attach target for a section name.
///
/// Unknown sections yield [`ProgramType::Unspecified`] and no target.
///
/// # Example
///
/// ```
/// use bpfgen_elf::program_type;
/// use bpfgen_ir::ProgramType;
///
/// assert_eq!(program_type("kprobe/sys_open"), (ProgramType::Kprobe, "sys_open"));
/// assert_eq!(program_type("xdp"), (ProgramType::Xdp, ""));
/// ```
pub fn program_type(section: &str) -> (ProgramType, &str) {
    for &(prefix, ty) in PROGRAM_SECTIONS {
        if let Some(rest) = section.strip_prefix(prefix) {
            let attach_to = if prefix.ends_with('/') { rest } else { "" };
            return (ty, attach_to);
        }
    }
    (ProgramType::Unspecified, "")
}
