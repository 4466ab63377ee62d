//! The static table every [`Fixture`](crate::Fixture) is copied from.

use crate::fixture::ObjectFormat;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry {
    pub url: Option<&'static str>,
    pub tags: &'static [&'static str],
    pub head: Option<&'static str>,
    pub packfile_hash: Option<&'static str>,
    pub dot_git_hash: Option<&'static str>,
    pub worktree_hash: Option<&'static str>,
    pub objects_count: u32,
    pub object_format: ObjectFormat,
}

impl Entry {
    const EMPTY: Entry = Entry {
        url: None,
        tags: &[],
        head: None,
        packfile_hash: None,
        dot_git_hash: None,
        worktree_hash: None,
        objects_count: 0,
        object_format: ObjectFormat::Sha1,
    };
}

const BASIC: &str = "https://github.com/git-fixtures/basic.git";

pub(crate) static CATALOG: &[Entry] = &[
    Entry {
        tags: &["packfile", "ofs-delta", ".git", "root-reference"],
        url: Some("https://github.com/git-fixtures/root-references.git"),
        head: Some("6ecf0ef2c2dffb796033e5a02219af86ec6584e5"),
        packfile_hash: Some("135fe3d1ad828afe68706f1d481aedbcfa7a86d2"),
        dot_git_hash: Some("78c5fb882e76286d8201016cffee63ea7060a0c2"),
        objects_count: 68,
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "ofs-delta", ".git"],
        url: Some(BASIC),
        head: Some("6ecf0ef2c2dffb796033e5a02219af86ec6584e5"),
        packfile_hash: Some("a3fed42da1e8189a077c0e6846c040dcf73fc9dd"),
        dot_git_hash: Some("7a725350b88b05ca03541b59dd0649fda7f521f2"),
        objects_count: 31,
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "ref-delta", ".git"],
        url: Some(BASIC),
        head: Some("6ecf0ef2c2dffb796033e5a02219af86ec6584e5"),
        packfile_hash: Some("c544593473465e6315ad4182d04d366c4592b829"),
        dot_git_hash: Some("7cbde0ca02f13aedd5ec8b358ca17b1c0bf5ee64"),
        objects_count: 31,
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "ofs-delta", ".git", "single-branch"],
        url: Some(BASIC),
        head: Some("6ecf0ef2c2dffb796033e5a02219af86ec6584e5"),
        packfile_hash: Some("61f0ee9c75af1f9678e6f76ff39fbe372b6f1c45"),
        dot_git_hash: Some("21504f6d2cc2ef0c9d6ebb8802c7b49abae40c1a"),
        objects_count: 28,
        ..Entry::EMPTY
    },
    Entry {
        tags: &[".git", "merge-conflict"],
        url: Some(BASIC),
        dot_git_hash: Some("4870d54b5b04e43da8cf99ceec179d9675494af8"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &[".git", "resolve-undo"],
        url: Some(BASIC),
        dot_git_hash: Some("df6781fd40b8f4911d70ce71f8387b991615cd6d"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &[".git", "intent-to-add"],
        url: Some(BASIC),
        dot_git_hash: Some("4e7600af05c3356e8b142263e127b76f010facfc"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &[".git", "index-v4"],
        url: Some(BASIC),
        dot_git_hash: Some("935e5ac17c41c309c356639816ea0694a568c484"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &[".git", "end-of-index-entry"],
        url: Some(BASIC),
        dot_git_hash: Some("ab06771a67110b976953d34400d4dbc465ccd2d9"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["worktree"],
        url: Some(BASIC),
        worktree_hash: Some("d2e42ddd68eacbb6034e7724e0dd4117ff1f01ee"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["worktree", "submodule"],
        url: Some("https://github.com/git-fixtures/submodule.git"),
        worktree_hash: Some("8b4d55c85677b6b94bef2e46832ed2174ed6ecaf"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", ".git", "unpacked", "multi-packfile"],
        url: Some("https://github.com/src-d/go-git.git"),
        head: Some("e8788ad9165781196e917292d6055cba1d78664e"),
        packfile_hash: Some("3559b3b47e695b33b0913237a4df3357e739831c"),
        dot_git_hash: Some("174be6bd4292c18160542ae6dc6704b877b8a01a"),
        objects_count: 2133,
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", ".git", "tags"],
        url: Some("https://github.com/git-fixtures/tags.git"),
        head: Some("f7b877701fbf855b44c0a9e86f3fdce2c298b07f"),
        dot_git_hash: Some("c0c7c57ab1753ddbd26cc45322299ddd12842794"),
        packfile_hash: Some("b68617dd8637fe6409d9842825a843a1d9a6e484"),
        objects_count: 7,
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile"],
        url: Some("https://github.com/spinnaker/spinnaker.git"),
        head: Some("06ce06d0fc49646c4de733c45b7788aabad98a6f"),
        packfile_hash: Some("f2e0a8889a746f7600e07d2246a2e29a72f696be"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile"],
        url: Some("https://github.com/jamesob/desk.git"),
        head: Some("d2313db6e7ca7bac79b819d767b2a1449abb0a5d"),
        packfile_hash: Some("4ec6344877f494690fc800aceaf2ca0e86786acb"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "empty-folder"],
        url: Some("https://github.com/cpcs499/Final_Pres_P.git"),
        head: Some("70bade703ce556c2c7391a8065c45c943e8b6bc3"),
        packfile_hash: Some("29f304662fd64f102d94722cf5bd8802d9a9472c"),
        dot_git_hash: Some("e1580a78f7d36791249df76df8a2a2613d629902"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "diff-tree"],
        url: Some("https://github.com/github/gem-builder.git"),
        packfile_hash: Some("1ea0b3971fd64fdcdf3282bfb58e8cf10095e4e6"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "diff-tree"],
        url: Some("https://github.com/githubtraining/example-branches.git"),
        packfile_hash: Some("bb8ee94710d3fa39379a630f76812c187217b312"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "diff-tree"],
        url: Some("https://github.com/rumpkernel/rumprun-xen.git"),
        packfile_hash: Some("7861f2632868833a35fe5e4ab94f99638ec5129b"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "diff-tree"],
        url: Some("https://github.com/mcuadros/skeetr.git"),
        packfile_hash: Some("36ef7a2296bfd526020340d27c5e1faa805d8d38"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "diff-tree"],
        url: Some("https://github.com/dezfowler/LiteMock.git"),
        packfile_hash: Some("0d9b6cfc261785837939aaede5986d7a7c212518"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "diff-tree"],
        url: Some("https://github.com/tyba/storable.git"),
        packfile_hash: Some("0d3d824fb5c930e7e7e1f0f399f2976847d31fd3"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "diff-tree"],
        url: Some("https://github.com/toqueteos/ts3.git"),
        packfile_hash: Some("21b33a26eb7ffbd35261149fe5d886b9debab7cb"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["empty", ".git"],
        url: Some("https://github.com/git-fixtures/empty.git"),
        dot_git_hash: Some("bf3fedcc8e20fd0dec9172987ceea0038d17b516"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["worktree", "alternates"],
        worktree_hash: Some("a6b6ff89c593f042347113203ead1c14ab5733ce"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["worktree", "dirty"],
        worktree_hash: Some("7203669c66103305e56b9dcdf940a7fbeb515f28"),
        ..Entry::EMPTY
    },
    // Standalone packfile, not part of any other fixture repository.
    Entry {
        tags: &["packfile", "standalone"],
        packfile_hash: Some("3638209d310e10ea8d90c362d568be65dd5e03a6"),
        ..Entry::EMPTY
    },
    // Thin pack adding ee372bb on top of the spinnaker fixture head.
    Entry {
        tags: &["thinpack"],
        head: Some("ee372bb08322c1e6e7c6c4f953cc6bf72784e7fb"),
        packfile_hash: Some("ee4fef0ef8be5053ebae4ce75acf062ddf3031fb"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["merge-base"],
        dot_git_hash: Some("26baa505b9f6fb2024b9999c140b75514718c988"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["commit-graph"],
        head: Some("b9d69064b190e7aedccf84731ca1d917871f8a1c"),
        packfile_hash: Some("769137af7784db501bca677fbd56fef8b52515b7"),
        dot_git_hash: Some("cf717ccadce761d60bb4a8557a7b9a2efd23816a"),
        objects_count: 31,
        ..Entry::EMPTY
    },
    Entry {
        tags: &["commit-graph-chain"],
        head: Some("b9d69064b190e7aedccf84731ca1d917871f8a1c"),
        packfile_hash: Some("769137af7784db501bca677fbd56fef8b52515b7"),
        dot_git_hash: Some("00a1fc100787506f842e55511994f08df2c2cd66"),
        objects_count: 31,
        ..Entry::EMPTY
    },
    Entry {
        tags: &["commit-graph-chain-2"],
        head: Some("ec6f456c0e8c7058a29611429965aa05c190b54b"),
        packfile_hash: Some("06ede69e9eba9f1af36eeee184402dc3ad705cd7"),
        dot_git_hash: Some("77b6511a6e67c99162ebcecd2763a9a19a7ad429"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["worktree", "linked-worktree"],
        worktree_hash: Some("363d996b02d9c3b598f0176619f5c6a44a82480a"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["worktree", "main-branch", "no-master-head"],
        worktree_hash: Some("e3b91f99d8d050cac81d84fbef89172f58eeb745"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "codecommit"],
        packfile_hash: Some("9733763ae7ee6efcf452d373d6fff77424fb1dcc"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "delta-before-base"],
        packfile_hash: Some("90fedc00729b64ea0d0406db861be081cda25bbf"),
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile-sha256"],
        packfile_hash: Some("407497645643e18a7ba56c6132603f167fe9c51c00361ee0c81d74a8f55d0ee2"),
        object_format: ObjectFormat::Sha256,
        ..Entry::EMPTY
    },
    Entry {
        tags: &["packfile", "notes"],
        packfile_hash: Some("bc4b855a55cae7703c023d4e36e3a7c9f5d84491"),
        ..Entry::EMPTY
    },
    // The fixtures below are vendored in `data/`.
    Entry {
        tags: &["packfile", ".git", "sample"],
        head: Some("76a31dcfa80def7b010cdb3819115f2d9473acab"),
        packfile_hash: Some("381609ad9fb786c787683d1fb1149b4f1e3cb5fd"),
        dot_git_hash: Some("ce3050159dc1d4ffe4ae4002cdf7dee027ac3aba"),
        worktree_hash: Some("d254a59594cebe0ce22579588019fc42f6bdfa4b"),
        objects_count: 14,
        ..Entry::EMPTY
    },
    Entry {
        tags: &["worktree", "sample-worktree"],
        worktree_hash: Some("d254a59594cebe0ce22579588019fc42f6bdfa4b"),
        ..Entry::EMPTY
    },
];
