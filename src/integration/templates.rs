//! File templates for consumer projects.
//!
//! Pure text generation: nothing here touches the file system.

use serde_json::{json, Value};

use super::{Framework, GeneratedFile, IntegrationOptions};
use crate::design_system::tokens::push_declarations;
use crate::design_system::{ComponentCode, TokenCollection};

/// Colour tokens mapped directly to a Tailwind colour.
const FLAT_COLORS: [&str; 5] = ["border", "input", "ring", "background", "foreground"];

/// Colour tokens mapped to a `DEFAULT`/`foreground` pair.
const PAIRED_COLORS: [&str; 7] = [
    "primary",
    "secondary",
    "destructive",
    "muted",
    "accent",
    "popover",
    "card",
];

/// Generates `globals.css`: the theme variable blocks followed by base rules.
#[must_use]
pub fn global_css(tokens: &TokenCollection) -> String {
    let mut css = String::from("@import \"tailwindcss\";\n\n:root {\n");
    push_declarations(&mut css, &tokens.light);
    css.push_str("}\n\n.dark {\n");
    push_declarations(&mut css, &tokens.dark);
    css.push_str(
        "}\n\
         \n\
         * {\n  border-color: hsl(var(--border));\n}\n\
         \n\
         body {\n  background-color: hsl(var(--background));\n  color: hsl(var(--foreground));\n}\n",
    );
    css
}

/// Generates `tailwind.config.ts` with colour and radius mappings onto the
/// theme's CSS variables.
#[must_use]
pub fn tailwind_config(options: &IntegrationOptions) -> String {
    let mut content = vec!["'./src/**/*.{ts,tsx}',"];
    if options.setup_storybook {
        content.push("'./stories/**/*.{ts,tsx}',");
    }
    if options.framework == Framework::Next {
        content.push("'./app/**/*.{ts,tsx}',");
        content.push("'./pages/**/*.{ts,tsx}',");
    }

    let mut out = String::from(
        "import type { Config } from 'tailwindcss'\n\
         \n\
         const config: Config = {\n  darkMode: ['class'],\n  content: [\n",
    );
    for glob in content {
        out.push_str("    ");
        out.push_str(glob);
        out.push('\n');
    }
    out.push_str("  ],\n  theme: {\n    extend: {\n      colors: {\n");

    for name in FLAT_COLORS {
        out.push_str(&format!("        {name}: 'hsl(var(--{name}))',\n"));
    }
    for name in PAIRED_COLORS {
        out.push_str(&format!(
            "        {name}: {{\n          DEFAULT: 'hsl(var(--{name}))',\n          foreground: 'hsl(var(--{name}-foreground))',\n        }},\n"
        ));
    }

    out.push_str(
        "      },\n      borderRadius: {\n\
         \x20       lg: 'var(--radius)',\n\
         \x20       md: 'calc(var(--radius) - 2px)',\n\
         \x20       sm: 'calc(var(--radius) - 4px)',\n\
         \x20     },\n    },\n  },\n  plugins: [],\n}\n\nexport default config\n",
    );
    out
}

/// Generates `vite.config.ts` with the React and Tailwind plugins and an `@`
/// alias for `src`.
#[must_use]
pub const fn vite_config() -> &'static str {
    "import { defineConfig } from 'vite'
import react from '@vitejs/plugin-react'
import tailwindcss from '@tailwindcss/vite'
import { resolve } from 'path'

export default defineConfig({
  plugins: [
    react(),
    tailwindcss(),
  ],
  resolve: {
    alias: {
      '@': resolve(__dirname, './src'),
    },
  },
})
"
}

/// Generates `next.config.js`.
#[must_use]
pub const fn next_config() -> &'static str {
    "/** @type {import('next').NextConfig} */
const nextConfig = {
  experimental: {
    optimizePackageImports: ['@radix-ui/react-slot'],
  },
}

module.exports = nextConfig
"
}

/// Generates the `tsconfig.json` document for a framework.
#[must_use]
pub fn tsconfig(framework: Framework) -> Value {
    let mut include = vec!["src"];
    if framework == Framework::Next {
        include.extend(["next-env.d.ts", "**/*.ts", "**/*.tsx"]);
    }

    json!({
        "compilerOptions": {
            "target": "ES2020",
            "useDefineForClassFields": true,
            "lib": ["ES2020", "DOM", "DOM.Iterable"],
            "module": "ESNext",
            "skipLibCheck": true,
            "moduleResolution": "bundler",
            "allowImportingTsExtensions": true,
            "resolveJsonModule": true,
            "isolatedModules": true,
            "noEmit": true,
            "jsx": "react-jsx",
            "strict": true,
            "noUnusedLocals": true,
            "noUnusedParameters": true,
            "noFallthroughCasesInSwitch": true,
            "baseUrl": ".",
            "paths": {
                "@/*": ["./src/*"]
            }
        },
        "include": include,
        "references": []
    })
}

/// Generates `src/lib/utils.ts` with the `cn` class-name helper.
#[must_use]
pub const fn utils_module() -> &'static str {
    "import { type ClassValue, clsx } from 'clsx'
import { twMerge } from 'tailwind-merge'

export function cn(...inputs: ClassValue[]) {
  return twMerge(clsx(inputs))
}
"
}

/// Generates `src/components/index.ts`, re-exporting the components in the
/// order given.
#[must_use]
pub fn main_index(library_name: &str, components: &[String]) -> String {
    let mut out = format!("// Auto-generated exports for {library_name} components\n");
    for name in components {
        out.push_str(&format!("export * from './{}'\n", name.to_lowercase()));
    }
    out.push_str("export * from '../lib/utils'\n");
    out
}

/// Directory a component is written to in the consumer project.
#[must_use]
pub fn component_dir(name: &str) -> String {
    format!("src/components/{}", name.to_lowercase())
}

/// File entries for one component's sources.
#[must_use]
pub fn component_files(name: &str, code: &ComponentCode, include_stories: bool) -> Vec<GeneratedFile> {
    let dir = component_dir(name);
    let lower = name.to_lowercase();

    let mut files = vec![GeneratedFile::create(
        format!("{dir}/{lower}.tsx"),
        code.tsx.clone(),
    )];

    if let Some(index) = &code.index {
        files.push(GeneratedFile::create(format!("{dir}/index.ts"), index.clone()));
    }

    if include_stories {
        if let Some(stories) = &code.stories {
            files.push(GeneratedFile::create(
                format!("{dir}/{lower}.stories.tsx"),
                stories.clone(),
            ));
        }
    }

    files
}
