//! Channel name assignment.

use std::collections::HashSet;

use qm_channels::Channel;

/// Ensure every channel carries a name.
///
/// Unnamed channels are assigned `channel-<n>` with the smallest `n` whose
/// name is not already taken, scanning channels in input order. Taken
/// names include both explicit names anywhere in the batch and names
/// assigned earlier in the same pass, so re-running over fully named
/// channels changes nothing.
pub fn assign_channel_names(channels: &[Channel]) -> Vec<Channel> {
    let mut taken: HashSet<String> = channels
        .iter()
        .filter_map(|channel| channel.name().map(str::to_string))
        .collect();

    channels
        .iter()
        .map(|channel| {
            if channel.name().is_some() {
                return channel.clone();
            }
            let mut n = 0usize;
            let name = loop {
                let candidate = format!("channel-{n}");
                if !taken.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            taken.insert(name.clone());
            channel.clone().with_name(name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use qm_channels::Repository;

    use super::*;

    fn unnamed() -> Channel {
        Channel::new(vec![Repository::new("central", "file:///repo")])
    }

    fn named(name: &str) -> Channel {
        unnamed().with_name(name)
    }

    fn names(channels: &[Channel]) -> Vec<String> {
        channels
            .iter()
            .map(|c| c.name().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_assigns_sequential_names() {
        let assigned = assign_channel_names(&[unnamed(), unnamed(), unnamed()]);
        assert_eq!(names(&assigned), vec!["channel-0", "channel-1", "channel-2"]);
    }

    #[test]
    fn test_skips_explicitly_taken_names() {
        let assigned = assign_channel_names(&[unnamed(), named("channel-0"), unnamed()]);
        assert_eq!(names(&assigned), vec!["channel-1", "channel-0", "channel-2"]);
    }

    #[test]
    fn test_skips_gap_in_explicit_names() {
        let assigned = assign_channel_names(&[named("channel-1"), unnamed(), unnamed()]);
        assert_eq!(names(&assigned), vec!["channel-1", "channel-0", "channel-2"]);
    }

    #[test]
    fn test_fully_named_input_unchanged() {
        let input = vec![named("stable"), named("dev")];
        let assigned = assign_channel_names(&input);
        assert_eq!(assigned, input);
    }

    #[test]
    fn test_rerun_is_a_no_op_on_names() {
        let first = assign_channel_names(&[unnamed(), named("stable"), unnamed()]);
        let second = assign_channel_names(&first);
        assert_eq!(second, first);
    }

    #[test]
    fn test_non_counter_names_do_not_block_assignment() {
        let assigned = assign_channel_names(&[named("stable"), unnamed()]);
        assert_eq!(names(&assigned), vec!["stable", "channel-0"]);
    }
}
