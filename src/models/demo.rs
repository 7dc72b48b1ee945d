use std::fmt::Display;

/// 演示页面描述
///
/// `name` 决定输出文件名，`url` 是相对于开发服务器的路径。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoDescriptor {
    pub name: &'static str,
    pub url: &'static str,
}

/// 需要录制的演示页面（按顺序录制）
pub const DEMOS: &[DemoDescriptor] = &[
    DemoDescriptor {
        name: "swiss",
        url: "/demo/swiss.html",
    },
    DemoDescriptor {
        name: "standard",
        url: "/demo/standard.html",
    },
    DemoDescriptor {
        name: "technical",
        url: "/demo/technical.html",
    },
    DemoDescriptor {
        name: "terminal",
        url: "/demo/terminal.html",
    },
    DemoDescriptor {
        name: "blueprint",
        url: "/demo/blueprint.html",
    },
    DemoDescriptor {
        name: "gallery",
        url: "/demo/gallery.html",
    },
];

impl Display for DemoDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[演示 {}]", self.name)
    }
}
