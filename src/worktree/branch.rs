//! Branch names generated from a free-form description.

/// Turn a human description into a `prefix/slug` branch name.
///
/// The prefix is inferred from the first word when the description has more
/// than one word:
///
/// - "fix login redirect bug" → `fix/login-redirect-bug`
/// - "add user avatars" → `feat/user-avatars`
/// - "update payment flow" → `feat/update-payment-flow`
/// - "something random" → `wip/something-random`
///
/// Returns an empty string for a blank description.
pub fn generate_branch_name(description: &str) -> String {
    let desc = description.trim().to_lowercase();
    if desc.is_empty() {
        return String::new();
    }

    let words: Vec<&str> = desc.split_whitespace().collect();
    let (prefix, body) = if words.len() > 1 {
        match words[0] {
            "fix" | "bugfix" | "hotfix" => ("fix", &words[1..]),
            "add" | "feat" | "feature" | "implement" => ("feat", &words[1..]),
            "refactor" | "cleanup" | "clean" => ("refactor", &words[1..]),
            // The verb carries meaning here, keep it.
            "update" | "improve" | "enhance" => ("feat", &words[..]),
            "test" | "tests" => ("test", &words[1..]),
            "docs" | "doc" | "document" => ("docs", &words[1..]),
            "chore" => ("chore", &words[1..]),
            _ => ("wip", &words[..]),
        }
    } else {
        ("wip", &words[..])
    };

    let slug = slugify(&body.join("-"));
    if slug.is_empty() {
        format!("{prefix}/branch")
    } else {
        format!("{prefix}/{slug}")
    }
}

/// Keep `[a-z0-9-]`, trim dashes and collapse runs of dashes.
fn slugify(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    for part in kept.split('-').filter(|p| !p.is_empty()) {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(part);
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_branch_name_detects_intent() {
        let cases = [
            ("fix login redirect bug", "fix/login-redirect-bug"),
            ("Hotfix crash on start", "fix/crash-on-start"),
            ("add user avatars", "feat/user-avatars"),
            ("implement OAuth flow", "feat/oauth-flow"),
            ("refactor auth middleware", "refactor/auth-middleware"),
            ("update payment flow", "feat/update-payment-flow"),
            ("tests for parser", "test/for-parser"),
            ("document the CLI", "docs/the-cli"),
            ("chore bump deps", "chore/bump-deps"),
            ("something random", "wip/something-random"),
        ];
        for (input, want) in cases {
            assert_eq!(generate_branch_name(input), want, "input {input:?}");
        }
    }

    #[test]
    fn single_word_is_wip() {
        assert_eq!(generate_branch_name("fix"), "wip/fix");
        assert_eq!(generate_branch_name("spike"), "wip/spike");
    }

    #[test]
    fn strips_punctuation_and_collapses_dashes() {
        assert_eq!(generate_branch_name("fix the -- login/redirect!"), "fix/the-loginredirect");
        assert_eq!(generate_branch_name("add ???"), "feat/branch");
    }

    #[test]
    fn blank_description_is_empty() {
        assert_eq!(generate_branch_name(""), "");
        assert_eq!(generate_branch_name("   "), "");
    }
}
