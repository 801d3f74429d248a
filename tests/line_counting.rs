mod common;

use common::{commit_files, git, has_git, init_git_repo};
use glloc::branches::{choose_branch, BranchPolicy};
use glloc::count::LanguageTable;
use glloc::git::GitRepo;
use glloc::lines::count_branches;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use tempfile::tempdir;

fn langs(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn only_table_extensions_are_counted() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_files(
        dir.path(),
        &[
            ("a.py", b"import os\n\nprint(os.name)\n\n   \nx = 1\n"),
            ("b.png", b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR"),
            ("c.md", b"# t\n1\n2\n3\n4\n"),
        ],
    );

    let repo = GitRepo::open(Some(dir.path())).unwrap();
    let stats = repo.branch_stats("main", &LanguageTable::default()).unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.languages, langs(&[("Python", 3)]));
}

#[test]
fn brace_rule_applies_to_csharp_only() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_files(
        dir.path(),
        &[
            ("src/Program.cs", b"line1\r\n{\r\n  }  \r\nline2\r\n\r\n"),
            ("web/app.js", b"function f()\n{\n}\n"),
        ],
    );

    let repo = GitRepo::open(Some(dir.path())).unwrap();
    let stats = repo.branch_stats("main", &LanguageTable::default()).unwrap();

    assert_eq!(stats.languages, langs(&[("C#", 2), ("JavaScript", 3)]));
    assert_eq!(stats.total, 5);
}

#[test]
fn legacy_encoded_files_and_unknown_branches_are_tolerated() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_files(
        dir.path(),
        &[
            ("legacy.py", b"x = '\xff\xfe'\n\n"),
            ("Form.cs", b"// \xcf\xf0\xe8\xe2\xe5\xf2\r\n{\r\n}\r\n"),
            ("good.py", b"a\nb\n"),
        ],
    );

    let repo = GitRepo::open(Some(dir.path())).unwrap();
    let table = LanguageTable::default();

    let stats = repo.branch_stats("main", &table).unwrap();
    assert_eq!(stats.languages, langs(&[("C#", 1), ("Python", 3)]));
    assert!(repo.branch_stats("does-not-exist", &table).is_none());
}

#[test]
fn equal_branches_pick_first_candidate() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_files(dir.path(), &[("Service.cs", b"a\nb\nc\nd\ne\nf\ng\nh\ni\nj\n")]);
    git(dir.path(), &["branch", "master"]);

    let repo = GitRepo::open(Some(dir.path())).unwrap();
    let candidates = BranchPolicy::default().candidates(Some("main"), ["main", "master"]);
    let results = count_branches(&repo, candidates.clone(), &LanguageTable::default());

    let (branch, stats) = choose_branch(results).unwrap();
    assert_eq!(branch, "main");
    assert_eq!(stats.total, 10);
    assert!(candidates.contains(&branch));
}

#[test]
fn dev_branch_with_more_code_wins() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_files(dir.path(), &[("main.py", b"print(1)\n")]);
    git(dir.path(), &["checkout", "-q", "-b", "feature/Dev-ui"]);
    commit_files(dir.path(), &[("ui.tsx", b"export const A = 1;\nexport const B = 2;\n")]);
    git(dir.path(), &["checkout", "-q", "main"]);

    let repo = GitRepo::open(Some(dir.path())).unwrap();
    let candidates =
        BranchPolicy::default().candidates(Some("main"), ["main", "feature/Dev-ui", "hotfix"]);
    assert_eq!(candidates, vec!["main", "master", "feature/Dev-ui"]);

    let results = count_branches(&repo, candidates, &LanguageTable::default());
    assert!(results[1].1.is_none(), "master does not exist");

    let (branch, stats) = choose_branch(results).unwrap();
    assert_eq!(branch, "feature/Dev-ui");
    assert_eq!(stats.languages, langs(&[("Python", 1), ("TypeScript", 2)]));
}

#[test]
fn repository_without_matching_files_has_no_stats() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_files(dir.path(), &[("README.md", b"hello\n"), ("empty.cs", b"{\n}\n\n")]);

    let repo = GitRepo::open(Some(dir.path())).unwrap();
    let results = count_branches(
        &repo,
        vec!["main".to_string(), "master".to_string()],
        &LanguageTable::default(),
    );
    assert!(results.iter().all(|(_, s)| s.is_none()));
    assert!(choose_branch(results).is_none());
}

#[test]
fn head_branch_is_reported() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_files(dir.path(), &[("a.py", b"1\n")]);

    let repo = GitRepo::open(Some(dir.path())).unwrap();
    assert_eq!(repo.head_branch().unwrap().as_deref(), Some("main"));
}
