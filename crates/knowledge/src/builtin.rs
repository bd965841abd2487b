//! The builtin FAQ table.

use dave_core::knowledge::{KnowledgeEntry, RelatedLink};

fn entry(
    id: &str,
    category: &str,
    question: &str,
    answer: &str,
    keywords: &[&str],
    links: &[(&str, &str)],
) -> KnowledgeEntry {
    KnowledgeEntry {
        id: id.into(),
        category: category.into(),
        question: question.into(),
        answer: answer.into(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        related_links: links
            .iter()
            .map(|(title, url)| RelatedLink {
                title: title.to_string(),
                url: url.to_string(),
                is_external: true,
            })
            .collect(),
    }
}

/// The twelve entries DAVE ships with.
pub fn builtin_entries() -> Vec<KnowledgeEntry> {
    vec![
        entry(
            "1",
            "geral",
            "O que é o DAVE?",
            "DAVE significa Database Assistant Virtual Engine. Sou um assistente virtual criado para ajudar você com dúvidas sobre administração de bancos de dados, análise de performance, migrações e uso das ferramentas disponíveis nesta plataforma.",
            &["dave", "assistente", "o que é", "sobre", "plataforma"],
            &[],
        ),
        entry(
            "2",
            "geral",
            "Quais ferramentas estão disponíveis?",
            "No momento, temos três ferramentas principais:\n\n1. **Estimador de Migração SQL Server** - Para planejar projetos de migração\n2. **Analisador de Performance SQL Server** - Para comparar estatísticas de queries\n3. **Modelo de Health Check SQL Server** - Documento para documentar implantações\n\nEm breve teremos mais ferramentas, incluindo conversores de scripts, geradores de tabelas e monitores em tempo real.",
            &["ferramentas", "disponíveis", "lista", "tools", "recursos"],
            &[("Estimador de Migração", "https://relatoriomigracao.vercel.app/"), ("Analisador de Performance", "https://analise-query.vercel.app/")],
        ),
        entry(
            "3",
            "migracao",
            "Como usar o Estimador de Migração?",
            "O Estimador de Migração SQL Server ajuda você a planejar projetos de migração. Para usar:\n\n1. Acesse a ferramenta clicando no card correspondente\n2. Informe o número de discos, instâncias e bancos de dados\n3. O sistema calculará automaticamente estimativas de tempo e recursos\n4. Você pode exportar o relatório gerado\n\nÉ ideal para apresentar propostas e dimensionar projetos.",
            &["migração", "estimador", "migration", "como usar", "planejamento"],
            &[("Abrir Estimador", "https://relatoriomigracao.vercel.app/")],
        ),
        entry(
            "4",
            "performance",
            "Como analisar performance de queries?",
            "O Analisador de Performance permite comparar estatísticas antes e depois de otimizações:\n\n1. Acesse o Analisador de Performance\n2. Insira as estatísticas ANTES da otimização (tempo de execução, leituras lógicas, etc.)\n3. Insira as estatísticas DEPOIS da otimização\n4. O sistema calculará automaticamente as melhorias percentuais\n5. Você pode visualizar gráficos comparativos e exportar o relatório\n\nÉ perfeito para validar melhorias e apresentar resultados para stakeholders.",
            &["performance", "query", "otimização", "análise", "estatísticas", "io"],
            &[("Abrir Analisador", "https://analise-query.vercel.app/")],
        ),
        entry(
            "5",
            "sql-server",
            "O que é um Health Check SQL Server?",
            "O Health Check é uma avaliação completa do ambiente SQL Server que inclui:\n\n- Análise de configurações e recursos\n- Identificação de gargalos de performance\n- Verificação de segurança e compliance\n- Recomendações de melhorias\n- Documentação de riscos e oportunidades\n\nO modelo disponível na plataforma ajuda você a estruturar e documentar todas as fases desse processo.",
            &["health check", "diagnóstico", "avaliação", "análise", "sql server"],
            &[],
        ),
        entry(
            "6",
            "sql-server",
            "Como fazer download do modelo de Health Check?",
            "Para baixar o modelo:\n\n1. Na página inicial, localize o card \"Modelo de Health Check SQL Server\"\n2. Clique no botão \"Baixar modelo\"\n3. O documento será baixado automaticamente em formato Word (.docx)\n4. Se houver problemas no download, o sistema abrirá o Google Docs automaticamente\n\nO modelo inclui seções para escopo técnico, cronograma, riscos e recomendações.",
            &["download", "modelo", "health check", "baixar", "documento"],
            &[],
        ),
        entry(
            "7",
            "postgresql",
            "Vocês têm ferramentas para PostgreSQL?",
            "Atualmente, nossas ferramentas focam principalmente em SQL Server, mas estamos trabalhando em recursos para PostgreSQL, incluindo:\n\n- Conversor de scripts SQL Server → PostgreSQL\n- Analisador de performance PostgreSQL\n- Comparador de schemas\n- Gerador de migrations\n\nEssas ferramentas serão adicionadas em breve ao DAVE.",
            &["postgresql", "postgres", "pg", "ferramentas", "suporte"],
            &[],
        ),
        entry(
            "8",
            "performance",
            "Como interpretar estatísticas de I/O?",
            "Estatísticas de I/O do SQL Server mostram o impacto das operações de disco:\n\n**Leituras Lógicas**: Páginas lidas da memória (mais rápido)\n**Leituras Físicas**: Páginas lidas do disco (mais lento)\n**Tempo de CPU**: Processamento usado pela query\n**Tempo Decorrido**: Tempo total incluindo esperas\n\nIdeal é ter:\n- Poucas leituras físicas (dados em cache)\n- Leituras lógicas reduzidas (melhor plano de execução)\n- Tempo de CPU próximo ao tempo decorrido (sem esperas)",
            &["io", "leituras", "físicas", "lógicas", "estatísticas", "set statistics io"],
            &[],
        ),
        entry(
            "9",
            "migracao",
            "Quanto tempo leva uma migração SQL Server?",
            "O tempo de migração depende de vários fatores:\n\n**Tamanho dos dados**: Pode variar de horas a dias\n**Complexidade**: Scripts, procedures, jobs, etc.\n**Downtime permitido**: Migração online vs offline\n**Recursos disponíveis**: Rede, storage, CPU\n\nUse o Estimador de Migração para calcular tempos específicos baseados em:\n- Número de instâncias\n- Quantidade de bancos de dados\n- Volume de dados total\n\nO estimador considera práticas recomendadas e médias de mercado.",
            &["tempo", "duração", "migração", "quanto tempo", "prazo"],
            &[("Calcular Estimativa", "https://relatoriomigracao.vercel.app/")],
        ),
        entry(
            "10",
            "geral",
            "Como entrar em contato ou reportar problemas?",
            "Para suporte, sugestões ou reportar problemas:\n\n- Esta plataforma foi criada por **Andressa Mirian**\n- Você pode usar o feedback nas respostas do DAVE para melhorar o assistente\n- Em breve teremos uma seção de contato direta\n\nSuas interações ajudam o DAVE a aprender e melhorar continuamente!",
            &["contato", "suporte", "ajuda", "problemas", "bug", "reportar"],
            &[],
        ),
        entry(
            "11",
            "sql-server",
            "O que são índices e por que são importantes?",
            "Índices são estruturas que aceleram consultas no banco de dados, funcionando como um \"índice de livro\".\n\n**Tipos principais**:\n- **Clustered**: Define a ordem física dos dados (1 por tabela)\n- **Non-clustered**: Ponteiros para os dados (múltiplos permitidos)\n- **Columnstore**: Otimizado para analytics\n\n**Benefícios**:\n✓ Queries mais rápidas\n✓ Menos leituras de disco\n✓ Melhor uso de recursos\n\n**Cuidados**:\n✗ Ocupam espaço\n✗ Podem tornar INSERT/UPDATE mais lentos\n✗ Exigem manutenção periódica",
            &["índice", "index", "performance", "otimização", "clustered", "non-clustered"],
            &[],
        ),
        entry(
            "12",
            "geral",
            "Quais ferramentas estão em desenvolvimento?",
            "Estamos trabalhando em várias ferramentas novas:\n\n🔄 **Conversor SQL Server → PostgreSQL**: Traduz scripts automaticamente\n📊 **Gerador de tabelas**: Cria DDL a partir de especificações\n⚡ **Monitor de queries em tempo real**: Acompanha execuções ativas\n📝 **Central de logs**: Auditoria e rastreamento de mudanças\n🎯 **Assistente de tuning**: Sugestões automáticas de otimização\n\nTodas serão integradas ao DAVE quando estiverem prontas!",
            &["futuro", "em breve", "desenvolvimento", "novidades", "roadmap"],
            &[],
        ),
    ]
}

/// Starter questions offered under the chat input.
pub const SUGGESTIONS: [&str; 8] = [
    "O que é o DAVE?",
    "Quais ferramentas estão disponíveis?",
    "Como usar o Estimador de Migração?",
    "Como analisar performance de queries?",
    "O que são índices?",
    "Quanto tempo leva uma migração?",
    "Como fazer download do modelo de Health Check?",
    "Quais ferramentas estão em desenvolvimento?",
];

/// Reply used when no entry scores above zero.
pub const FALLBACK_MESSAGE: &str = "Desculpe, não encontrei uma resposta específica para sua pergunta. Estou aprendendo continuamente!\n\nVocê pode tentar perguntar de outra forma ou explorar estas opções:\n\n• \"O que é o DAVE?\"\n• \"Quais ferramentas estão disponíveis?\"\n• \"Como analisar performance de queries?\"\n• \"Como usar o Estimador de Migração?\"\n\nSua pergunta foi registrada para melhorar minhas respostas futuras.";
